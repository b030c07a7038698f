use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("instant answer request failed: {0}")]
    RequestFailed(String),
    #[error("instant answer response was invalid: {0}")]
    InvalidResponse(String),
}

/// Thin client for an abstract-lookup service (DuckDuckGo Instant Answer
/// API shape). Returns `Ok(None)` when the service has no concise answer;
/// the caller falls through to the generative path.
#[derive(Clone)]
pub struct InstantAnswerClient {
    client: reqwest::Client,
    endpoint: String,
}

impl InstantAnswerClient {
    pub fn new(endpoint: String, timeout_ms: u64) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|err| LookupError::RequestFailed(err.to_string()))?;

        Ok(Self { client, endpoint })
    }

    pub async fn quick_answer(&self, query: &str) -> Result<Option<String>, LookupError> {
        let url = build_lookup_url(&self.endpoint, query)
            .map_err(|err| LookupError::RequestFailed(format!("bad endpoint url: {err}")))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| LookupError::RequestFailed(err.to_string()))?;

        if !response.status().is_success() {
            return Err(LookupError::RequestFailed(format!(
                "status={}",
                response.status().as_u16()
            )));
        }

        let payload: InstantAnswerResponse = response
            .json()
            .await
            .map_err(|err| LookupError::InvalidResponse(err.to_string()))?;

        let answer = extract_answer(payload);
        debug!(found = answer.is_some(), "instant answer lookup completed");
        Ok(answer)
    }
}

fn build_lookup_url(endpoint: &str, query: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(endpoint)?;
    url.query_pairs_mut()
        .append_pair("q", query)
        .append_pair("format", "json")
        .append_pair("no_html", "1")
        .append_pair("skip_disambig", "1");

    Ok(url)
}

#[derive(Debug, Deserialize)]
struct InstantAnswerResponse {
    #[serde(rename = "AbstractText", default)]
    abstract_text: String,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<RelatedTopic>,
}

#[derive(Debug, Deserialize)]
struct RelatedTopic {
    #[serde(rename = "Text", default)]
    text: Option<String>,
}

fn extract_answer(payload: InstantAnswerResponse) -> Option<String> {
    if !payload.abstract_text.trim().is_empty() {
        return Some(payload.abstract_text);
    }

    payload
        .related_topics
        .into_iter()
        .filter_map(|topic| topic.text)
        .find(|text| !text.trim().is_empty())
}
