use anyhow::Result;
use teloxide::prelude::*;

use crate::ai::Model;
use crate::messages::{ASK_NEEDS_IMAGE, EMPTY_QUESTION, REQUEST_LIMIT, TRY_LATER};
use crate::session::{AskError, Sessions, ValidationError};
use crate::utils::send_transient;

/// Answer a plain text message as a question about the current invoice.
pub async fn answer_question(
    bot: Bot,
    msg: Message,
    sessions: Sessions,
    model: Model,
    delete_after_timeout: u64,
) -> Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let chat_id = msg.chat.id;

    let session = sessions.get(chat_id).await;
    let mut session = session.lock().await;
    match session.ask(model.gateway(), model.id(), text).await {
        Ok(entry) => {
            tracing::info!(chat_id = chat_id.0, "Answered invoice question");
            bot.send_message(chat_id, entry.answer()).await?;
        }
        Err(AskError::Validation(ValidationError::MissingImage)) => {
            bot.send_message(chat_id, ASK_NEEDS_IMAGE).await?;
        }
        Err(AskError::Validation(ValidationError::EmptyQuestion)) => {
            bot.send_message(chat_id, EMPTY_QUESTION).await?;
        }
        Err(AskError::Gateway(err)) => {
            tracing::warn!(chat_id = chat_id.0, error = %err, "Answer request failed");
            let notice = if err.is_rate_limited() {
                REQUEST_LIMIT
            } else {
                TRY_LATER
            };
            send_transient(&bot, chat_id, notice, delete_after_timeout).await?;
        }
    }
    Ok(())
}
