use crate::{
    DialogResponse, TurnEvent,
    exercise::ExerciseSource,
    session_state::{DrillState, Session},
    speech,
};

/// The exercise posed right after the caller introduces themselves.
///
/// NOTE This is a fixed warm-up rather than a generated exercise. Its operands sit
/// outside the generator's range, so it must not be built through `Exercise`.
pub const BOOTSTRAP_EXERCISE: &str = "100 plus 100";
pub const BOOTSTRAP_RESULT: i64 = 200;

/// Decides how to answer each turn of a drill conversation.
///
/// The controller keeps no state of its own between turns; everything it needs
/// is reconstructed from the `Session` it is handed. It only owns the source of
/// new exercises.
pub struct DialogController<S> {
    exercises: S,
}

impl<S: ExerciseSource> DialogController<S> {
    pub fn new(exercises: S) -> Self {
        Self { exercises }
    }

    /// Handles one turn, updating `session` in place.
    ///
    /// Rules are checked in order and the first match wins: a name starts the
    /// warm-up exercise, an answer is graded against the pending exercise, and
    /// everything else (including an answer with nothing pending) poses a new one.
    pub fn handle_turn(&mut self, session: &mut Session, turn: TurnEvent) -> DialogResponse {
        tracing::debug!(state = ?session.state(), turn = ?turn, "Handling turn");

        match turn {
            TurnEvent::ProvideName(name) => Self::greet(session, name),
            TurnEvent::ProvideAnswer(answer) => match session.state() {
                DrillState::ExercisePending { exercise, result } => {
                    Self::grade(exercise, result, answer)
                }
                DrillState::AwaitingExercise => {
                    tracing::warn!(answer, "Answer received with no pending exercise");
                    self.pose_new_exercise(session)
                }
            },
            TurnEvent::Launch | TurnEvent::Unrecognized => self.pose_new_exercise(session),
        }
    }

    fn greet(session: &mut Session, name: String) -> DialogResponse {
        let speech = speech::greet_with_exercise(&name, BOOTSTRAP_EXERCISE);
        session.name = Some(name);
        session.pose(BOOTSTRAP_EXERCISE, BOOTSTRAP_RESULT);

        DialogResponse::ask(speech, speech::answer_hint(BOOTSTRAP_EXERCISE))
    }

    // Grading never touches the session: a wrong answer leaves the same exercise
    // pending, and a right one waits for the next turn to pose a fresh exercise.
    fn grade(exercise: &str, expected: i64, answer: i64) -> DialogResponse {
        let correct = answer == expected;
        tracing::info!(exercise, answer, expected, correct, "Graded answer");

        let speech = if correct {
            speech::correct(exercise, answer)
        } else {
            speech::incorrect(exercise, answer, expected)
        };
        DialogResponse::ask(speech, speech::answer_hint(exercise))
    }

    fn pose_new_exercise(&mut self, session: &mut Session) -> DialogResponse {
        let exercise = self.exercises.next_exercise();
        tracing::debug!(exercise = %exercise, result = exercise.result, "Posing new exercise");

        let response = DialogResponse::ask(
            speech::ask_exercise(&exercise.rendered_text),
            speech::repeat_exercise(&exercise.rendered_text),
        );
        session.pose(exercise.rendered_text, exercise.result);
        response
    }
}
