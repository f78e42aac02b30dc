use anyhow::Result;
use teloxide::prelude::*;

use crate::messages::RESET_DONE;
use crate::session::Sessions;

pub async fn reset_session(bot: Bot, chat_id: ChatId, sessions: &Sessions) -> Result<()> {
    let session = sessions.get(chat_id).await;
    session.lock().await.reset();
    sessions.remove(chat_id).await;
    tracing::info!(chat_id = chat_id.0, "Session reset");
    bot.send_message(chat_id, RESET_DONE).await?;
    Ok(())
}
