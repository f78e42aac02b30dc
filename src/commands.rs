use anyhow::Result;
use teloxide::{prelude::*, utils::command::BotCommands};

use crate::ai::Model;
use crate::handlers::{choose_language, help, reset_session, send_items, show_history};
use crate::session::Sessions;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported:"
)]
pub enum Command {
    #[command(description = "display this text.")]
    Start,
    #[command(description = "display this text.")]
    Help,
    #[command(description = "choose the answer language, e.g. /language Hindi.")]
    Language(String),
    #[command(description = "send the extracted items as CSV again.")]
    Items,
    #[command(description = "list previous questions and answers.")]
    History,
    #[command(description = "forget the invoice and conversation.")]
    Reset,
}

impl Command {
    pub async fn dispatch(
        self,
        bot: Bot,
        msg: Message,
        sessions: Sessions,
        model: Model,
        delete_after_timeout: u64,
    ) -> Result<()> {
        match self {
            Command::Start | Command::Help => help(bot, msg).await?,
            Command::Language(name) => {
                choose_language(bot, msg, &sessions, &model, name, delete_after_timeout).await?
            }
            Command::Items => {
                send_items(bot, msg.chat.id, &sessions, &model, delete_after_timeout).await?
            }
            Command::History => show_history(bot, msg.chat.id, &sessions).await?,
            Command::Reset => reset_session(bot, msg.chat.id, &sessions).await?,
        }
        Ok(())
    }
}
