use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

pub type LlmGatewayFuture<'a> =
    Pin<Box<dyn Future<Output = Result<LlmGatewayResponse, LlmGatewayError>> + Send + 'a>>;

#[derive(Debug, Clone)]
pub struct LlmGatewayRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl LlmGatewayRequest {
    pub fn new(system_prompt: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            temperature: 0.7,
            max_output_tokens: 400,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmGatewayResponse {
    pub model: String,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum LlmGatewayError {
    #[error("generative provider request timed out")]
    Timeout,
    #[error("generative provider request failed: {0}")]
    ProviderFailure(String),
    #[error("generative provider returned an invalid payload: {0}")]
    InvalidProviderPayload(String),
}

pub trait LlmGateway: Send + Sync {
    fn generate<'a>(&'a self, request: LlmGatewayRequest) -> LlmGatewayFuture<'a>;
}
