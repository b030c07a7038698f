use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use shared::models::CreateSessionResponse;

use super::AppState;

pub(super) async fn create_session(State(state): State<AppState>) -> Response {
    let access_token = state
        .sessions
        .create(state.session_ttl_seconds, Utc::now())
        .await;

    (
        StatusCode::OK,
        Json(CreateSessionResponse {
            access_token,
            expires_in: state.session_ttl_seconds as u32,
        }),
    )
        .into_response()
}
