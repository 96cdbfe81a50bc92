pub mod dialog;
pub mod exercise;
pub mod session_state;
pub mod speech;

pub use dialog::DialogController;
pub use exercise::{Exercise, ExerciseGenerator, ExerciseSource, Operator};
pub use session_state::{DrillState, Session, SessionError};

/// One decoded turn of the conversation, as handed to the `DialogController`.
///
/// The transport resolves slots before building a turn. When a name or a number
/// cannot be resolved it must send `Unrecognized` instead of a half-filled event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnEvent {
    /// The caller opened the drill without saying anything specific.
    Launch,
    /// The caller told us their name.
    ProvideName(String),
    /// The caller answered the pending exercise.
    ProvideAnswer(i64),
    /// Anything else.
    Unrecognized,
}

/// What the runtime should say in reply to a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogResponse {
    /// Spoken right away.
    pub speech: String,
    /// Spoken if the caller stays silent; the timeout is the runtime's business.
    pub reprompt: String,
    /// `false` ends the conversation.
    pub expects_answer: bool,
}

impl DialogResponse {
    /// A response that keeps the conversation open.
    pub fn ask(speech: impl Into<String>, reprompt: impl Into<String>) -> Self {
        Self {
            speech: speech.into(),
            reprompt: reprompt.into(),
            expects_answer: true,
        }
    }
}
