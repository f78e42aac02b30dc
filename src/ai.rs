pub mod config;
pub mod gateway;
pub mod gemini;
pub mod prompts;

pub use config::AiConfig;
pub use gateway::{GatewayError, Model, ModelGateway, PromptPart};
pub use gemini::GeminiGateway;
pub use prompts::{build_prompt, question_part, PromptMode};
