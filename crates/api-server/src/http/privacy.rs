use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use shared::models::{MessageResponse, PrivacyChoiceRequest};
use shared::privacy::PrivacyChoice;
use tracing::info;

use super::errors::unauthorized_response;
use super::{AppState, SessionUser};

const INVALID_OPTION_MESSAGE: &str = "Invalid option selected.";
const HISTORY_ENABLED_MESSAGE: &str = "History access has been enabled.";

pub(super) async fn privacy_choice(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Json(req): Json<PrivacyChoiceRequest>,
) -> Response {
    let Some(choice) = PrivacyChoice::parse(&req.option) else {
        return message_response(INVALID_OPTION_MESSAGE);
    };

    match state.sessions.apply_consent(&user.key, choice).await {
        Some(authorization) => {
            info!(
                granted = authorization.granted,
                scope = ?authorization.scope,
                "privacy choice applied"
            );
            message_response(choice.confirmation_text())
        }
        None => unauthorized_response(),
    }
}

pub(super) async fn enable_history(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> Response {
    match state
        .sessions
        .apply_consent(&user.key, PrivacyChoice::EnableForSession)
        .await
    {
        Some(_) => message_response(HISTORY_ENABLED_MESSAGE),
        None => unauthorized_response(),
    }
}

fn message_response(response: &str) -> Response {
    (
        StatusCode::OK,
        Json(MessageResponse {
            response: response.to_string(),
        }),
    )
        .into_response()
}
