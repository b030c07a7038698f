use std::path::PathBuf;
use std::sync::Arc;

use api_server::http::{AppState, build_router};
use shared::lookup::InstantAnswerClient;
use shared::session::SessionStore;

use super::llm_stub::StubLlmGateway;

/// Lookup endpoint nothing listens on; quick-answer attempts fail fast and
/// the general path falls through to the stub gateway.
const UNREACHABLE_LOOKUP_URL: &str = "http://127.0.0.1:9/";

pub fn build_test_app(
    llm_gateway: Arc<StubLlmGateway>,
    history_store_override: Option<PathBuf>,
) -> axum::Router {
    let lookup = InstantAnswerClient::new(UNREACHABLE_LOOKUP_URL.to_string(), 500)
        .expect("lookup client should build");

    build_router(AppState {
        sessions: SessionStore::new(),
        llm_gateway,
        lookup,
        session_ttl_seconds: 3600,
        history_store_override,
    })
}
