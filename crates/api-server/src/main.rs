use std::net::SocketAddr;
use std::sync::Arc;

use api_server::http;
use shared::config::ApiConfig;
use shared::llm::{GeminiGateway, GeminiGatewayConfig};
use shared::lookup::InstantAnswerClient;
use shared::session::SessionStore;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "api_server=debug,shared=debug,axum=info".to_string()),
        )
        .init();

    let config = match ApiConfig::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            error!("failed to read config: {err}");
            std::process::exit(1);
        }
    };

    let gemini_config = match GeminiGatewayConfig::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            error!("failed to read generative provider config: {err}");
            std::process::exit(1);
        }
    };

    let llm_gateway = match GeminiGateway::new(gemini_config) {
        Ok(gateway) => gateway,
        Err(err) => {
            error!("failed to build generative gateway: {err}");
            std::process::exit(1);
        }
    };

    let lookup = match InstantAnswerClient::new(
        config.instant_answer_url.clone(),
        config.instant_answer_timeout_ms,
    ) {
        Ok(client) => client,
        Err(err) => {
            error!("failed to build instant answer client: {err}");
            std::process::exit(1);
        }
    };

    let app = http::build_router(http::AppState {
        sessions: SessionStore::new(),
        llm_gateway: Arc::new(llm_gateway),
        lookup,
        session_ttl_seconds: config.session_ttl_seconds,
        history_store_override: config.history_store_override.clone(),
    });

    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .unwrap_or_else(|_| "127.0.0.1:8080".parse().expect("valid default bind addr"));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("bind should succeed");

    info!(
        "api server listening on {}",
        listener.local_addr().unwrap_or(addr)
    );
    axum::serve(listener, app).await.expect("server should run");
}
