use serde_json::{Map, Value};

/// Attribute key holding the caller's name.
pub const NAME_KEY: &str = "NAME";
/// Attribute key holding the spoken text of the exercise that is waiting for an answer.
pub const LAST_EXERCISE_KEY: &str = "LastExercise";
/// Attribute key holding the expected result of that exercise.
pub const LAST_RESULT_KEY: &str = "LastAnswer";

/// A custom error type for session attributes that cannot be read back.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SessionError {
    #[error("Session attribute {0} must be a string, got {1}")]
    NotAString(&'static str, Value),
    #[error("Session attribute {0} must be an integer, got {1}")]
    NotAnInteger(&'static str, Value),
}

/// Per-conversation state carried between turns.
///
/// The platform owns the attribute map; this struct is the validated view of it
/// that the dialog controller works on for the duration of one turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub name: Option<String>,
    pub last_exercise: Option<String>,
    pub last_result: Option<i64>,
}

/// Where the drill currently stands, reconstructed from the session each turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrillState<'a> {
    /// No exercise has been posed yet.
    AwaitingExercise,
    /// An exercise was posed and its answer is pending.
    ExercisePending { exercise: &'a str, result: i64 },
}

impl Session {
    /// Reads a session back from the platform's attribute map.
    ///
    /// Unknown keys are ignored and `null` counts as absent. `LastAnswer` is accepted
    /// either as a JSON integer or as a string holding one.
    pub fn from_attributes(attributes: &Map<String, Value>) -> Result<Self, SessionError> {
        Ok(Self {
            name: string_attribute(attributes, NAME_KEY)?,
            last_exercise: string_attribute(attributes, LAST_EXERCISE_KEY)?,
            last_result: integer_attribute(attributes, LAST_RESULT_KEY)?,
        })
    }

    /// Writes the session into an attribute map, omitting absent fields.
    pub fn to_attributes(&self) -> Map<String, Value> {
        let mut attributes = Map::new();
        if let Some(name) = &self.name {
            attributes.insert(NAME_KEY.to_string(), Value::from(name.as_str()));
        }
        if let Some(exercise) = &self.last_exercise {
            attributes.insert(LAST_EXERCISE_KEY.to_string(), Value::from(exercise.as_str()));
        }
        if let Some(result) = self.last_result {
            attributes.insert(LAST_RESULT_KEY.to_string(), Value::from(result));
        }
        attributes
    }

    /// An exercise only counts as pending when both its text and its result are stored.
    pub fn state(&self) -> DrillState<'_> {
        match (&self.last_exercise, self.last_result) {
            (Some(exercise), Some(result)) => DrillState::ExercisePending {
                exercise: exercise.as_str(),
                result,
            },
            _ => DrillState::AwaitingExercise,
        }
    }

    /// Replaces the pending exercise.
    pub fn pose(&mut self, exercise_text: impl Into<String>, result: i64) {
        self.last_exercise = Some(exercise_text.into());
        self.last_result = Some(result);
    }
}

fn string_attribute(
    attributes: &Map<String, Value>,
    key: &'static str,
) -> Result<Option<String>, SessionError> {
    match attributes.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(SessionError::NotAString(key, other.clone())),
    }
}

fn integer_attribute(
    attributes: &Map<String, Value>,
    key: &'static str,
) -> Result<Option<i64>, SessionError> {
    match attributes.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| SessionError::NotAnInteger(key, Value::Number(n.clone()))),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| SessionError::NotAnInteger(key, Value::String(s.clone()))),
        Some(other) => Err(SessionError::NotAnInteger(key, other.clone())),
    }
}
