//! Test doubles shared by unit and integration tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ai::{GatewayError, Model, ModelGateway, PromptPart};
use crate::invoice::InvoiceImage;

/// Gateway that replays scripted replies in order and records every request.
///
/// Once the script runs out every call fails with a 503.
#[derive(Default)]
pub struct ScriptedGateway {
    replies: Mutex<VecDeque<Result<String, GatewayError>>>,
    calls: Mutex<Vec<(Vec<PromptPart>, String)>>,
}

impl ScriptedGateway {
    pub fn new(replies: impl IntoIterator<Item = Result<String, GatewayError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn replying<S: Into<String>>(replies: impl IntoIterator<Item = S>) -> Self {
        Self::new(replies.into_iter().map(|r| Ok(r.into())))
    }

    pub fn calls(&self) -> Vec<Vec<PromptPart>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(parts, _)| parts.clone())
            .collect()
    }

    pub fn models(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, model)| model.clone())
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    async fn call(&self, parts: &[PromptPart], model: &str) -> Result<String, GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push((parts.to_vec(), model.to_string()));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unavailable()))
    }
}

pub fn unavailable() -> GatewayError {
    GatewayError::Status {
        status: 503,
        body: "model overloaded".to_string(),
    }
}

pub fn scripted_model(gateway: &Arc<ScriptedGateway>) -> Model {
    Model::new(gateway.clone(), "test-model")
}

pub fn sample_image(key: &str) -> InvoiceImage {
    InvoiceImage::new(key, b"fake-jpeg".to_vec(), "image/jpeg")
}
