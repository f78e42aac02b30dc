//! Re-render stored answers after the output language changes.

use tracing::{debug, info, instrument, warn};

use super::context::SessionContext;
use crate::ai::prompts::{build_prompt, PromptMode};
use crate::ai::{GatewayError, ModelGateway, PromptPart};
use crate::language::Language;

#[derive(Debug)]
pub enum Reconciliation {
    /// Answers are already in the selected language; nothing was sent.
    UpToDate,
    Reconciled {
        language: Language,
        translated: usize,
        total: usize,
        /// Set when the pass stopped early.
        error: Option<GatewayError>,
    },
}

impl Reconciliation {
    /// Some entries kept their previous text.
    pub fn is_partial(&self) -> bool {
        matches!(self, Reconciliation::Reconciled { error: Some(_), .. })
    }

    pub fn translated(&self) -> usize {
        match self {
            Reconciliation::UpToDate => 0,
            Reconciliation::Reconciled { translated, .. } => *translated,
        }
    }
}

/// Translate every stored answer into the session's current language.
///
/// Entries are processed in stored order (newest first). The first failed
/// call ends the pass; entries already translated keep their new text. The
/// session is marked as rendered in the new language either way, so the same
/// change is reconciled at most once.
#[instrument(level = "debug", skip_all, fields(language = %session.language()))]
pub async fn reconcile(
    session: &mut SessionContext,
    gateway: &dyn ModelGateway,
    model: &str,
) -> Reconciliation {
    let language = session.language();
    if language == session.rendered_language() {
        debug!("answers already rendered in this language");
        return Reconciliation::UpToDate;
    }

    let prompt = build_prompt(PromptMode::Translate, language);
    let total = session.conversation().len();
    let mut translated = 0;
    let mut error = None;

    for entry in session.conversation_mut().iter_mut() {
        let parts = [
            PromptPart::text(prompt.clone()),
            PromptPart::text(entry.answer.clone()),
        ];
        match gateway.call(&parts, model).await {
            Ok(text) => {
                entry.answer = text.trim().to_string();
                translated += 1;
            }
            Err(err) => {
                warn!(error = %err, translated, total, "translation pass aborted");
                error = Some(err);
                break;
            }
        }
    }

    session.mark_rendered();
    info!(translated, total, "translation pass finished");
    Reconciliation::Reconciled {
        language,
        translated,
        total,
        error,
    }
}
