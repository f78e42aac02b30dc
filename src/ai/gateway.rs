//! Boundary to the hosted language model.
//!
//! Every flow in the bot (extraction, answering, translation) goes through
//! [`ModelGateway::call`]. The returned text carries no structural guarantee,
//! so callers must validate it before showing anything derived from it.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// One ordered piece of a model request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PromptPart {
    Text(String),
    Image { data: Vec<u8>, media_type: String },
}

impl PromptPart {
    pub fn text(text: impl Into<String>) -> Self {
        PromptPart::Text(text.into())
    }

    pub fn image(data: impl Into<Vec<u8>>, media_type: impl Into<String>) -> Self {
        PromptPart::Image {
            data: data.into(),
            media_type: media_type.into(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PromptPart::Text(t) => Some(t),
            PromptPart::Image { .. } => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("model request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("model API error {status}: {body}")]
    Status { status: u16, body: String },
    #[error("model response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("model returned no text")]
    EmptyResponse,
}

impl GatewayError {
    /// Quota exhaustion is reported as HTTP 429.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, GatewayError::Status { status: 429, .. })
    }
}

/// A single-attempt, request/response call to the model.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    async fn call(&self, parts: &[PromptPart], model: &str) -> Result<String, GatewayError>;
}

/// The shared gateway together with the model id every call uses.
#[derive(Clone)]
pub struct Model {
    gateway: Arc<dyn ModelGateway>,
    id: String,
}

impl Model {
    pub fn new(gateway: Arc<dyn ModelGateway>, id: impl Into<String>) -> Self {
        Self {
            gateway,
            id: id.into(),
        }
    }

    pub fn gateway(&self) -> &dyn ModelGateway {
        self.gateway.as_ref()
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_detection() {
        let err = GatewayError::Status {
            status: 429,
            body: "quota".into(),
        };
        assert!(err.is_rate_limited());
        assert!(!GatewayError::EmptyResponse.is_rate_limited());
    }

    #[test]
    fn text_accessor_ignores_images() {
        assert_eq!(PromptPart::text("hi").as_text(), Some("hi"));
        assert_eq!(PromptPart::image(vec![1u8], "image/png").as_text(), None);
    }
}
