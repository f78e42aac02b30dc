use anyhow::Result;
use teloxide::{prelude::*, types::InputFile};

use crate::ai::Model;
use crate::invoice::{ExtractionResult, FailureReason, CSV_FILE_NAME};
use crate::messages::{
    items_caption, EXTRACTION_FAILED, IMAGE_UNCLEAR, NO_ITEMS_FOUND, TRY_LATER, UPLOAD_FIRST,
};
use crate::session::{SessionContext, Sessions};
use crate::utils::send_transient;

/// Show the extraction outcome: the CSV document, or why there is none.
pub async fn present_extraction(
    bot: &Bot,
    chat_id: ChatId,
    result: Option<&ExtractionResult>,
    delete_after_timeout: u64,
) -> Result<()> {
    match result {
        None => {
            bot.send_message(chat_id, UPLOAD_FIRST).await?;
        }
        Some(ExtractionResult::Empty) => {
            bot.send_message(chat_id, NO_ITEMS_FOUND).await?;
        }
        Some(ExtractionResult::Unreadable) => {
            bot.send_message(chat_id, IMAGE_UNCLEAR).await?;
        }
        Some(ExtractionResult::Rows(table)) => {
            let csv = table.to_csv()?;
            tracing::debug!(chat_id = chat_id.0, bytes = csv.len(), "Sending CSV artifact");
            bot.send_document(chat_id, InputFile::memory(csv).file_name(CSV_FILE_NAME))
                .caption(items_caption(table.lines().len()))
                .await?;
        }
        Some(ExtractionResult::Failed(reason)) => {
            if *reason == FailureReason::Gateway {
                send_transient(bot, chat_id, TRY_LATER, delete_after_timeout).await?;
            }
            bot.send_message(chat_id, EXTRACTION_FAILED).await?;
        }
    }
    Ok(())
}

/// Run (or reuse) the extraction for the session's image and show it.
pub(crate) async fn extract_and_present(
    bot: &Bot,
    chat_id: ChatId,
    session: &mut SessionContext,
    model: &Model,
    delete_after_timeout: u64,
) -> Result<()> {
    match session.extraction(model.gateway(), model.id()).await {
        Ok(result) => present_extraction(bot, chat_id, result, delete_after_timeout).await,
        Err(err) => {
            tracing::warn!(chat_id = chat_id.0, error = %err, "Extraction not applied");
            let failed = ExtractionResult::Failed(FailureReason::Gateway);
            present_extraction(bot, chat_id, Some(&failed), delete_after_timeout).await
        }
    }
}

/// Re-send the artifact for the current invoice.
pub async fn send_items(
    bot: Bot,
    chat_id: ChatId,
    sessions: &Sessions,
    model: &Model,
    delete_after_timeout: u64,
) -> Result<()> {
    let session = sessions.get(chat_id).await;
    let mut session = session.lock().await;
    extract_and_present(&bot, chat_id, &mut session, model, delete_after_timeout).await
}
