use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Router, middleware};
use shared::llm::LlmGateway;
use shared::lookup::InstantAnswerClient;
use shared::session::{SessionKey, SessionStore};

mod authn;
mod errors;
mod health;
mod privacy;
mod search;
mod session;

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub llm_gateway: Arc<dyn LlmGateway>,
    pub lookup: InstantAnswerClient,
    pub session_ttl_seconds: u64,
    pub history_store_override: Option<PathBuf>,
}

#[derive(Clone)]
pub(super) struct SessionUser {
    pub(super) key: SessionKey,
}

pub fn build_router(app_state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/healthz", get(health::healthz))
        .route("/v1/session", post(session::create_session))
        .with_state(app_state.clone());

    let auth_layer_state = app_state.clone();

    let protected_routes = Router::new()
        .route("/search", post(search::search))
        .route("/privacy", post(privacy::privacy_choice))
        .route("/enable-history", post(privacy::enable_history))
        .layer(middleware::from_fn_with_state(
            auth_layer_state,
            authn::session_middleware,
        ))
        .with_state(app_state);

    public_routes.merge(protected_routes)
}
