pub mod gateway;
pub mod gemini;
pub mod prompts;

pub use gateway::{
    LlmGateway, LlmGatewayError, LlmGatewayFuture, LlmGatewayRequest, LlmGatewayResponse,
};
pub use gemini::{GeminiConfigError, GeminiGateway, GeminiGatewayConfig};
pub use prompts::{AnswerPromptInputs, SYSTEM_PROMPT, build_answer_prompt};
