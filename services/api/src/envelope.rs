//! Wire format of the voice platform.
//!
//! The platform posts a request envelope per turn and expects a response envelope
//! back. This module only translates between that JSON and the core's typed
//! `TurnEvent` / `DialogResponse`; it makes no dialog decisions itself.

use calclearn_core::{DialogResponse, Session, TurnEvent};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

pub const MY_NAME_IS_INTENT: &str = "MyNameIsIntent";
pub const ANSWER_EXERCISE_INTENT: &str = "AnswerExerciseIntent";
pub const NAME_SLOT: &str = "Name";
pub const ANSWER_SLOT: &str = "Answer";

const RESPONSE_VERSION: &str = "1.0";
const CARD_TITLE: &str = "Session";

// --- Inbound ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    pub session: PlatformSession,
    pub request: PlatformRequest,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSession {
    #[serde(default)]
    pub new: bool,
    pub session_id: String,
    #[serde(default)]
    pub attributes: Option<Map<String, Value>>,
}

impl PlatformSession {
    pub fn attributes(&self) -> Map<String, Value> {
        self.attributes.clone().unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum PlatformRequest {
    LaunchRequest {
        request_id: String,
    },
    IntentRequest {
        request_id: String,
        #[serde(default)]
        intent: Option<Intent>,
    },
    SessionEndedRequest {
        request_id: String,
        #[serde(default)]
        reason: Option<String>,
    },
    /// Request types the drill has no use for.
    #[serde(other)]
    Other,
}

impl PlatformRequest {
    pub fn request_id(&self) -> Option<&str> {
        match self {
            PlatformRequest::LaunchRequest { request_id }
            | PlatformRequest::IntentRequest { request_id, .. }
            | PlatformRequest::SessionEndedRequest { request_id, .. } => Some(request_id.as_str()),
            PlatformRequest::Other => None,
        }
    }

    /// Decodes the request into a turn for the dialog controller.
    ///
    /// Returns `None` for `SessionEndedRequest`, which has nothing to answer.
    /// Intents whose slot cannot be resolved are downgraded to `Unrecognized`.
    pub fn to_turn(&self) -> Option<TurnEvent> {
        let turn = match self {
            PlatformRequest::LaunchRequest { .. } => TurnEvent::Launch,
            PlatformRequest::IntentRequest { intent, .. } => match intent {
                Some(intent) => intent.to_turn(),
                None => {
                    tracing::warn!("IntentRequest arrived without an intent");
                    TurnEvent::Unrecognized
                }
            },
            PlatformRequest::SessionEndedRequest { .. } => return None,
            PlatformRequest::Other => TurnEvent::Unrecognized,
        };
        Some(turn)
    }
}

#[derive(Debug, Deserialize)]
pub struct Intent {
    pub name: String,
    #[serde(default)]
    pub slots: HashMap<String, Slot>,
}

#[derive(Debug, Deserialize)]
pub struct Slot {
    #[serde(default)]
    pub value: Option<String>,
}

impl Intent {
    /// The trimmed value of a slot, if the platform resolved one.
    pub fn slot_value(&self, slot: &str) -> Option<&str> {
        self.slots
            .get(slot)
            .and_then(|s| s.value.as_deref())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    fn to_turn(&self) -> TurnEvent {
        match self.name.as_str() {
            MY_NAME_IS_INTENT => match self.slot_value(NAME_SLOT) {
                Some(name) => TurnEvent::ProvideName(name.to_string()),
                None => {
                    tracing::warn!("{} arrived without a name", MY_NAME_IS_INTENT);
                    TurnEvent::Unrecognized
                }
            },
            ANSWER_EXERCISE_INTENT => match self.slot_value(ANSWER_SLOT).map(str::parse::<i64>) {
                Some(Ok(answer)) => TurnEvent::ProvideAnswer(answer),
                Some(Err(_)) | None => {
                    tracing::warn!(
                        slot = ?self.slot_value(ANSWER_SLOT),
                        "{} arrived without a usable number",
                        ANSWER_EXERCISE_INTENT
                    );
                    TurnEvent::Unrecognized
                }
            },
            other => {
                tracing::debug!(intent = other, "Unhandled intent");
                TurnEvent::Unrecognized
            }
        }
    }
}

// --- Outbound ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub version: &'static str,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub session_attributes: Map<String, Value>,
    pub response: PlatformResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    pub should_end_session: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum OutputSpeech {
    PlainText { text: String },
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum Card {
    Simple { title: String, content: String },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

impl ResponseEnvelope {
    /// Wraps a dialog response together with the session it left behind.
    ///
    /// The reprompt is only sent while the conversation stays open.
    pub fn from_dialog(dialog: DialogResponse, session: &Session) -> Self {
        let reprompt = dialog.expects_answer.then(|| Reprompt {
            output_speech: OutputSpeech::PlainText {
                text: dialog.reprompt,
            },
        });

        Self {
            version: RESPONSE_VERSION,
            session_attributes: session.to_attributes(),
            response: PlatformResponse {
                card: Some(Card::Simple {
                    title: CARD_TITLE.to_string(),
                    content: dialog.speech.clone(),
                }),
                output_speech: Some(OutputSpeech::PlainText {
                    text: dialog.speech,
                }),
                reprompt,
                should_end_session: !dialog.expects_answer,
            },
        }
    }

    /// An acknowledgement with nothing to say, used once the session has ended.
    pub fn empty() -> Self {
        Self {
            version: RESPONSE_VERSION,
            session_attributes: Map::new(),
            response: PlatformResponse {
                output_speech: None,
                card: None,
                reprompt: None,
                should_end_session: true,
            },
        }
    }
}
