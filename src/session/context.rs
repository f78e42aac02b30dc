//! Per-chat state.
//!
//! Everything a chat remembers lives in one [`SessionContext`]; `reset()`
//! reinitializes all of it at once.

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::conversation::{Conversation, ConversationEntry};
use crate::ai::prompts::{build_prompt, question_part, PromptMode};
use crate::ai::{GatewayError, ModelGateway, PromptPart};
use crate::invoice::{normalize, ExtractionResult, FailureReason, ImageKey, InvoiceImage};
use crate::language::Language;

/// Rejected before any model call is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no invoice image uploaded")]
    MissingImage,
    #[error("question is empty")]
    EmptyQuestion,
}

#[derive(Debug, Error)]
pub enum AskError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

#[derive(Debug, Clone)]
pub struct SessionContext {
    default_language: Language,
    image: Option<InvoiceImage>,
    /// Extraction memo, valid only while the key matches the current image.
    extraction: Option<(ImageKey, ExtractionResult)>,
    conversation: Conversation,
    language: Language,
    /// Language the stored answers were last rendered in.
    rendered_language: Language,
}

impl SessionContext {
    pub fn new(default_language: Language) -> Self {
        Self {
            default_language,
            image: None,
            extraction: None,
            conversation: Conversation::new(),
            language: default_language,
            rendered_language: default_language,
        }
    }

    /// Drop the image, extraction, conversation and language choice.
    pub fn reset(&mut self) {
        *self = Self::new(self.default_language);
    }

    pub fn image(&self) -> Option<&InvoiceImage> {
        self.image.as_ref()
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub(crate) fn conversation_mut(&mut self) -> &mut Conversation {
        &mut self.conversation
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn rendered_language(&self) -> Language {
        self.rendered_language
    }

    /// Returns `true` when the preference actually changed.
    pub fn set_language(&mut self, language: Language) -> bool {
        let changed = self.language != language;
        self.language = language;
        changed
    }

    pub(crate) fn mark_rendered(&mut self) {
        self.rendered_language = self.language;
    }

    /// Replace the current image. Returns `false` if the same image was sent again.
    pub fn upload(&mut self, image: InvoiceImage) -> bool {
        let is_new = self.image.as_ref().map(InvoiceImage::key) != Some(image.key());
        debug!(
            key = %image.key(),
            size = image.data().len(),
            media_type = image.media_type(),
            is_new,
            "invoice image uploaded"
        );
        self.image = Some(image);
        is_new
    }

    /// The memoized extraction for the current image, if already computed.
    pub fn cached_extraction(&self) -> Option<&ExtractionResult> {
        let image = self.image.as_ref()?;
        match &self.extraction {
            Some((key, result)) if key == image.key() => Some(result),
            _ => None,
        }
    }

    /// Extract line items from the current image, at most once per image.
    ///
    /// Returns `Ok(None)` when no image has been uploaded. A gateway error is
    /// not memoized, so the next request for the same image calls again.
    #[instrument(level = "debug", skip_all)]
    pub async fn extraction(
        &mut self,
        gateway: &dyn ModelGateway,
        model: &str,
    ) -> Result<Option<&ExtractionResult>, GatewayError> {
        let Some(image) = self.image.as_ref() else {
            return Ok(None);
        };
        if self.cached_extraction().is_none() {
            let key = image.key().clone();
            let parts = [
                PromptPart::text(build_prompt(PromptMode::Extract, self.language)),
                image.to_prompt_part(),
            ];
            let raw = gateway.call(&parts, model).await.map_err(|err| {
                warn!(error = %err, key = %key, "extraction call failed");
                err
            })?;
            let result = normalize(&raw);
            info!(key = %key, result = outcome_label(&result), "extraction finished");
            self.extraction = Some((key, result));
        }
        Ok(self.cached_extraction())
    }

    /// Ask a question about the current invoice in the current language.
    ///
    /// On failure the conversation is left untouched.
    #[instrument(level = "debug", skip_all, fields(language = %self.language))]
    pub async fn ask(
        &mut self,
        gateway: &dyn ModelGateway,
        model: &str,
        question: &str,
    ) -> Result<&ConversationEntry, AskError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ValidationError::EmptyQuestion.into());
        }
        let image = self.image.as_ref().ok_or(ValidationError::MissingImage)?;

        let parts = [
            PromptPart::text(build_prompt(PromptMode::Answer, self.language)),
            image.to_prompt_part(),
            PromptPart::text(question_part(question)),
        ];
        let answer = gateway.call(&parts, model).await?;

        if self.conversation.is_empty() {
            self.mark_rendered();
        }
        debug!(entries = self.conversation.len() + 1, "storing answer");
        Ok(self.conversation.append(question, answer.trim()))
    }
}

fn outcome_label(result: &ExtractionResult) -> &'static str {
    match result {
        ExtractionResult::Empty => "empty",
        ExtractionResult::Unreadable => "unreadable",
        ExtractionResult::Rows(_) => "rows",
        ExtractionResult::Failed(FailureReason::Gateway) => "gateway-failure",
        ExtractionResult::Failed(FailureReason::Malformed) => "malformed",
    }
}
