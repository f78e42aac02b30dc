use std::env;

pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_THINKING_BUDGET: u32 = 128;

#[derive(Clone, Debug)]
pub struct AiConfig {
    pub api_key: String,
    pub model: String,
    /// Latency/quality knob forwarded as `thinkingBudget`.
    pub thinking_budget: u32,
    pub api_url: Option<String>,
}

impl AiConfig {
    pub fn from_env() -> Option<Self> {
        let api_key = match env::var("GEMINI_API_KEY") {
            Ok(k) if !k.trim().is_empty() => k,
            _ => return None,
        };
        let thinking_budget = env::var("GEMINI_THINKING_BUDGET")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_THINKING_BUDGET);
        Some(Self {
            api_key,
            model: env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            thinking_budget,
            api_url: env::var("GEMINI_API_URL").ok(),
        })
    }
}
