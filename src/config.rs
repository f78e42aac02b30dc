use std::env;

use crate::ai::config::AiConfig;
use crate::language::Language;
use crate::utils::DEFAULT_DELETE_AFTER_TIMEOUT;

/// Seconds a chat may stay silent before its session is dropped.
pub const DEFAULT_SESSION_IDLE_TIMEOUT: u64 = 3600;

#[derive(Clone, Debug)]
pub struct Config {
    pub ai: Option<AiConfig>,
    pub default_language: Language,
    /// Seconds before transient notices are removed from the chat.
    pub delete_after_timeout: u64,
    /// `0` keeps sessions until `/reset`.
    pub session_idle_timeout: u64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let default_language = match env::var("DEFAULT_LANGUAGE") {
            Ok(name) => name.parse().unwrap_or_else(|err| {
                tracing::warn!(%err, "falling back to English");
                Language::default()
            }),
            Err(_) => Language::default(),
        };
        let delete_after_timeout = env_u64("DELETE_AFTER_TIMEOUT", DEFAULT_DELETE_AFTER_TIMEOUT);
        let session_idle_timeout = env_u64("SESSION_IDLE_TIMEOUT", DEFAULT_SESSION_IDLE_TIMEOUT);
        Self {
            ai: AiConfig::from_env(),
            default_language,
            delete_after_timeout,
            session_idle_timeout,
        }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
