use anyhow::Result;
use teloxide::prelude::*;

use crate::messages::HELP_TEXT;

pub async fn help(bot: Bot, msg: Message) -> Result<()> {
    bot.send_message(msg.chat.id, HELP_TEXT)
        .parse_mode(teloxide::types::ParseMode::Html)
        .await?;
    Ok(())
}
