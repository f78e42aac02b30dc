use anyhow::Result;
use teloxide::prelude::*;

use super::items::extract_and_present;
use crate::ai::Model;
use crate::invoice::image::is_supported_media_type;
use crate::invoice::InvoiceImage;
use crate::messages::{UNSUPPORTED_FILE, UPLOAD_RECEIVED};
use crate::session::Sessions;
use crate::utils::download_telegram_file;

/// Telegram re-encodes photos as JPEG.
const PHOTO_MEDIA_TYPE: &str = "image/jpeg";

#[derive(Debug, PartialEq, Eq)]
struct InvoiceUpload {
    file_id: String,
    unique_id: String,
    media_type: String,
}

fn invoice_upload(msg: &Message) -> Option<InvoiceUpload> {
    if let Some(sizes) = msg.photo() {
        let largest = sizes.iter().max_by_key(|p| p.file.size)?;
        return Some(InvoiceUpload {
            file_id: largest.file.id.clone(),
            unique_id: largest.file.unique_id.to_string(),
            media_type: PHOTO_MEDIA_TYPE.to_string(),
        });
    }

    let doc = msg.document()?;
    let media_type = doc.mime_type.as_ref()?.to_string();
    if !is_supported_media_type(&media_type) {
        tracing::debug!(%media_type, "ignoring unsupported document");
        return None;
    }
    Some(InvoiceUpload {
        file_id: doc.file.id.clone(),
        unique_id: doc.file.unique_id.to_string(),
        media_type,
    })
}

/// Store a new invoice image for the chat and extract its items.
pub async fn receive_invoice(
    bot: Bot,
    msg: Message,
    sessions: Sessions,
    model: Model,
    delete_after_timeout: u64,
) -> Result<()> {
    let chat_id = msg.chat.id;
    let Some(upload) = invoice_upload(&msg) else {
        bot.send_message(chat_id, UNSUPPORTED_FILE).await?;
        return Ok(());
    };

    let bytes = download_telegram_file(&bot, &upload.file_id).await?;
    tracing::info!(
        chat_id = chat_id.0,
        size = bytes.len(),
        media_type = %upload.media_type,
        "Received invoice image"
    );
    let image = InvoiceImage::new(upload.unique_id, bytes, upload.media_type);

    let session = sessions.get(chat_id).await;
    let mut session = session.lock().await;
    if session.upload(image) {
        bot.send_message(chat_id, UPLOAD_RECEIVED).await?;
    }
    extract_and_present(&bot, chat_id, &mut session, &model, delete_after_timeout).await
}
