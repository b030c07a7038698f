use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use shared::llm::{
    LlmGateway, LlmGatewayFuture, LlmGatewayRequest, LlmGatewayResponse,
};

/// Canned generative gateway that counts invocations, so tests can assert
/// which queries were (or were not) delegated to the generative path.
pub struct StubLlmGateway {
    calls: AtomicUsize,
    response_text: String,
}

impl StubLlmGateway {
    pub fn with_response(response_text: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            response_text: response_text.to_string(),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LlmGateway for StubLlmGateway {
    fn generate<'a>(&'a self, _request: LlmGatewayRequest) -> LlmGatewayFuture<'a> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(LlmGatewayResponse {
                model: "stub-model".to_string(),
                text: self.response_text.clone(),
            })
        })
    }
}
