use axum::Json;
use axum::extract::{Extension, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use shared::classify;
use shared::client_env;
use shared::history::{
    self, HistoryError, HistoryStoreLocation, StoreKind, fetch_history, format_history,
};
use shared::llm::{AnswerPromptInputs, LlmGatewayRequest, SYSTEM_PROMPT, build_answer_prompt};
use shared::models::{SearchRequest, SearchResponse};
use shared::privacy::{GateDecision, SessionAuthorization, review_history_request};
use tracing::{debug, warn};

use super::errors::unauthorized_response;
use super::{AppState, SessionUser};

const EMPTY_QUERY_MESSAGE: &str = "Please enter a valid question.";
const UNSUPPORTED_BROWSER_MESSAGE: &str = "Unable to locate history for this browser.";
const HISTORY_DENIED_MESSAGE: &str = "History access is not authorized for this session.";
const ANSWER_UNAVAILABLE_MESSAGE: &str = "Sorry, I couldn't find a good answer.";

pub(super) async fn search(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    headers: HeaderMap,
    Json(req): Json<SearchRequest>,
) -> Response {
    let query = req.query.trim();
    if query.is_empty() {
        return text_response(EMPTY_QUERY_MESSAGE.to_string());
    }

    let Some(authorization) = state.sessions.authorization(&user.key).await else {
        return unauthorized_response();
    };
    debug!(
        history_access = authorization.granted,
        client_toggle = ?req.history_access,
        "routing search query"
    );

    if classify::is_history_query(query) {
        return handle_history_query(&state, query, &headers, authorization).await;
    }

    answer_general_query(&state, &user, query).await
}

async fn handle_history_query(
    state: &AppState,
    query: &str,
    headers: &HeaderMap,
    authorization: SessionAuthorization,
) -> Response {
    match review_history_request(&authorization) {
        GateDecision::PromptRequired { prompt, options } => {
            return (
                StatusCode::OK,
                Json(SearchResponse {
                    response: prompt,
                    options: Some(options),
                }),
            )
                .into_response();
        }
        GateDecision::Granted => {}
    }

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let env = client_env::detect(user_agent);

    let location = match &state.history_store_override {
        Some(path) => Some(HistoryStoreLocation {
            path: path.clone(),
            kind: StoreKind::Chromium,
        }),
        None => history::resolve_store_location(&env),
    };

    let Some(location) = location else {
        debug!(browser = env.browser.as_str(), "no history store for client environment");
        return text_response(UNSUPPORTED_BROWSER_MESSAGE.to_string());
    };

    let spec = classify::parse_history_query_spec(query, Utc::now().date_naive());
    match fetch_history(&location, &spec, &authorization).await {
        Ok(records) => text_response(format_history(&records)),
        Err(HistoryError::PermissionDenied) => {
            warn!("history extraction reached without a granted authorization");
            text_response(HISTORY_DENIED_MESSAGE.to_string())
        }
        Err(err) => {
            warn!("history extraction failed: {err}");
            text_response(format!("Error fetching browser history: {err}"))
        }
    }
}

async fn answer_general_query(state: &AppState, user: &SessionUser, query: &str) -> Response {
    match state.lookup.quick_answer(query).await {
        Ok(Some(answer)) => {
            state.sessions.record_exchange(&user.key, query, &answer).await;
            return text_response(answer);
        }
        Ok(None) => {}
        Err(err) => {
            warn!("instant answer lookup failed: {err}");
        }
    }

    let memory = state.sessions.memory(&user.key).await;
    let sentiment = classify::detect_sentiment(query);
    let prompt = build_answer_prompt(&AnswerPromptInputs {
        query,
        tone: sentiment.tone(),
        intent: classify::detect_intent(query),
        deep_answer: classify::needs_deep_answer(query),
        memory: &memory,
    });

    let request = LlmGatewayRequest::new(SYSTEM_PROMPT, prompt);
    match state.llm_gateway.generate(request).await {
        Ok(response) => {
            state
                .sessions
                .record_exchange(&user.key, query, &response.text)
                .await;
            text_response(response.text)
        }
        Err(err) => {
            warn!("generative answer failed: {err}");
            text_response(ANSWER_UNAVAILABLE_MESSAGE.to_string())
        }
    }
}

fn text_response(response: String) -> Response {
    (
        StatusCode::OK,
        Json(SearchResponse {
            response,
            options: None,
        }),
    )
        .into_response()
}
