use crate::envelope::{PlatformRequest, RequestEnvelope, ResponseEnvelope};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use calclearn_core::{DialogController, ExerciseGenerator, Session, SessionError};
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex};
use tracing::info;

type Controller = DialogController<ExerciseGenerator<StdRng>>;

/// Application state shared across handlers.
///
/// All conversations draw their exercises from one generator. The lock is only held
/// while a single turn is decided, never across an `.await`.
#[derive(Clone)]
pub struct AppState {
    controller: Arc<Mutex<Controller>>,
}

impl AppState {
    pub fn new(generator: ExerciseGenerator<StdRng>) -> Self {
        Self {
            controller: Arc::new(Mutex::new(DialogController::new(generator))),
        }
    }
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // The voice platform posts every turn to the root.
        .route("/", post(handle_envelope))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

/// Handles one turn posted by the voice platform.
async fn handle_envelope(
    State(state): State<AppState>,
    Json(envelope): Json<RequestEnvelope>,
) -> Result<Json<ResponseEnvelope>, AppError> {
    run_turn(&state, envelope).map(Json)
}

fn run_turn(state: &AppState, envelope: RequestEnvelope) -> Result<ResponseEnvelope, AppError> {
    let session_id = envelope.session.session_id.as_str();
    let request_id = envelope.request.request_id().unwrap_or("-");

    if envelope.session.new {
        info!(request_id, session_id, "Session started");
    }

    if let PlatformRequest::SessionEndedRequest { reason, .. } = &envelope.request {
        info!(request_id, session_id, reason = ?reason, "Session ended");
        return Ok(ResponseEnvelope::empty());
    }

    let Some(turn) = envelope.request.to_turn() else {
        return Ok(ResponseEnvelope::empty());
    };
    info!(request_id, session_id, turn = ?turn, "Turn received");

    let mut session = Session::from_attributes(&envelope.session.attributes())?;
    let response = {
        let mut controller = state
            .controller
            .lock()
            .map_err(|_| AppError::ControllerUnavailable)?;
        controller.handle_turn(&mut session, turn)
    };

    Ok(ResponseEnvelope::from_dialog(response, &session))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid session attributes: {0}")]
    InvalidSession(#[from] SessionError),
    #[error("Exercise generator is unavailable")]
    ControllerUnavailable,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::InvalidSession(_) => StatusCode::BAD_REQUEST,
            AppError::ControllerUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::error!(status = %status, "Request failed: {}", self);

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn state() -> AppState {
        AppState::new(ExerciseGenerator::seeded(11))
    }

    fn envelope(attributes: Value, request: Value) -> RequestEnvelope {
        serde_json::from_value(json!({
            "version": "1.0",
            "session": { "new": false, "sessionId": "s-1", "attributes": attributes },
            "request": request
        }))
        .unwrap()
    }

    fn answer(value: &str) -> Value {
        json!({
            "type": "IntentRequest",
            "requestId": "r-2",
            "intent": {
                "name": "AnswerExerciseIntent",
                "slots": { "Answer": { "name": "Answer", "value": value } }
            }
        })
    }

    async fn post(state: &AppState, envelope: RequestEnvelope) -> Value {
        let Json(response) = handle_envelope(State(state.clone()), Json(envelope))
            .await
            .expect("turn should succeed");
        serde_json::to_value(response).unwrap()
    }

    #[tokio::test]
    async fn test_launch_stores_the_spoken_exercise() {
        let state = state();

        let response = post(
            &state,
            envelope(json!({}), json!({ "type": "LaunchRequest", "requestId": "r-1" })),
        )
        .await;

        let exercise = response["sessionAttributes"]["LastExercise"]
            .as_str()
            .expect("exercise should be stored");
        assert!(response["sessionAttributes"]["LastAnswer"].is_i64());
        assert_eq!(
            response["response"]["outputSpeech"]["text"],
            json!(format!("Wieviel ist {exercise}"))
        );
        assert_eq!(response["response"]["shouldEndSession"], json!(false));
        assert!(response["response"]["reprompt"]["outputSpeech"]["text"].is_string());
    }

    #[tokio::test]
    async fn test_name_then_answer_round_trip() {
        let state = state();

        let greeted = post(
            &state,
            envelope(
                json!(null),
                json!({
                    "type": "IntentRequest",
                    "requestId": "r-1",
                    "intent": {
                        "name": "MyNameIsIntent",
                        "slots": { "Name": { "name": "Name", "value": "Uwe" } }
                    }
                }),
            ),
        )
        .await;
        assert_eq!(
            greeted["response"]["outputSpeech"]["text"],
            json!("Uwe, wieviel ist 100 plus 100")
        );

        let graded = post(
            &state,
            envelope(greeted["sessionAttributes"].clone(), answer("200")),
        )
        .await;
        assert_eq!(
            graded["response"]["outputSpeech"]["text"],
            json!("Richtig. 100 plus 100 macht 200. Noch ein Spiel?")
        );
        assert_eq!(graded["sessionAttributes"]["NAME"], json!("Uwe"));
    }

    #[tokio::test]
    async fn test_wrong_answer_leaves_attributes_unchanged() {
        let state = state();
        let attributes = json!({ "LastExercise": "7 minus 3", "LastAnswer": "4" });

        let response = post(&state, envelope(attributes, answer("5"))).await;

        assert_eq!(
            response["response"]["outputSpeech"]["text"],
            json!("Leider falsch. 7 minus 3 ist leider NICHT 5. Die richtige Antwort ist 4")
        );
        assert_eq!(
            response["sessionAttributes"],
            json!({ "LastExercise": "7 minus 3", "LastAnswer": 4 })
        );
    }

    #[tokio::test]
    async fn test_answer_on_empty_session_poses_a_new_exercise() {
        let state = state();

        let response = post(&state, envelope(json!({}), answer("3"))).await;

        let speech = response["response"]["outputSpeech"]["text"].as_str().unwrap();
        assert!(speech.starts_with("Wieviel ist "));
        assert!(response["sessionAttributes"]["LastExercise"].is_string());
    }

    #[tokio::test]
    async fn test_intent_request_without_intent_poses_a_new_exercise() {
        let state = state();

        let response = post(
            &state,
            envelope(
                json!({ "LastExercise": "7 minus 3", "LastAnswer": 4 }),
                json!({ "type": "IntentRequest", "requestId": "r-3", "intent": null }),
            ),
        )
        .await;

        let speech = response["response"]["outputSpeech"]["text"].as_str().unwrap();
        assert!(speech.starts_with("Wieviel ist "));
        assert_eq!(
            speech,
            format!(
                "Wieviel ist {}",
                response["sessionAttributes"]["LastExercise"].as_str().unwrap()
            )
        );
    }

    #[tokio::test]
    async fn test_session_end_returns_an_empty_envelope() {
        let state = state();

        let response = post(
            &state,
            envelope(
                json!({ "LastExercise": "1 plus 1", "LastAnswer": 2 }),
                json!({ "type": "SessionEndedRequest", "requestId": "r-9", "reason": "USER_INITIATED" }),
            ),
        )
        .await;

        assert_eq!(
            response,
            json!({ "version": "1.0", "response": { "shouldEndSession": true } })
        );
    }

    #[tokio::test]
    async fn test_malformed_session_is_a_bad_request() {
        let state = state();

        let result = handle_envelope(
            State(state),
            Json(envelope(
                json!({ "LastExercise": "7 minus 3", "LastAnswer": "vier" }),
                answer("4"),
            )),
        )
        .await;

        let error = result.err().expect("malformed session should fail");
        assert!(matches!(error, AppError::InvalidSession(_)));
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health() {
        assert_eq!(health().await, "ok");
    }
}
