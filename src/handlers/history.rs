use anyhow::Result;
use teloxide::prelude::*;

use crate::messages::{HISTORY_EMPTY, HISTORY_HEADER};
use crate::session::{Conversation, Sessions};
use crate::text_utils::{preview, PREVIEW_GRAPHEMES};

/// Stay below Telegram's 4096 character message limit.
const MAX_MESSAGE_CHARS: usize = 4000;
const MAX_ANSWER_GRAPHEMES: usize = 600;

/// Render the conversation newest-first, split into sendable messages.
pub fn format_history(conversation: &Conversation) -> Vec<String> {
    let mut messages = Vec::new();
    let mut current = format!("{HISTORY_HEADER}\n");

    for (i, entry) in conversation.iter().enumerate() {
        let block = format!(
            "\n{}. ❓ {}\n💬 {}\n",
            i + 1,
            preview(entry.question(), PREVIEW_GRAPHEMES),
            preview(entry.answer(), MAX_ANSWER_GRAPHEMES),
        );
        if current.chars().count() + block.chars().count() > MAX_MESSAGE_CHARS {
            messages.push(std::mem::take(&mut current));
        }
        current.push_str(&block);
    }
    if !current.is_empty() {
        messages.push(current);
    }
    messages
}

pub async fn show_history(bot: Bot, chat_id: ChatId, sessions: &Sessions) -> Result<()> {
    let session = sessions.get(chat_id).await;
    let chunks = {
        let session = session.lock().await;
        if session.conversation().is_empty() {
            None
        } else {
            Some(format_history(session.conversation()))
        }
    };

    match chunks {
        None => {
            bot.send_message(chat_id, HISTORY_EMPTY).await?;
        }
        Some(chunks) => {
            tracing::debug!(chat_id = chat_id.0, messages = chunks.len(), "Sending history");
            for chunk in chunks {
                bot.send_message(chat_id, chunk).await?;
            }
        }
    }
    Ok(())
}
