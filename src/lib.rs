use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use teloxide::{
    dispatching::UpdateHandler, prelude::*, utils::command::BotCommands,
};

pub mod ai;
pub mod commands;
pub mod config;
pub mod handlers;
pub mod invoice;
pub mod language;
pub mod messages;
pub mod session;
pub mod text_utils;
pub mod utils;

pub use commands::Command;
pub use config::Config;
pub use handlers::{answer_question, callback_handler, help, receive_invoice};
pub use utils::delete_after;

use ai::{GeminiGateway, Model, ModelGateway};
use session::Sessions;

fn is_invoice_upload(msg: &Message) -> bool {
    msg.photo().is_some() || msg.document().is_some()
}

/// Slash-prefixed text that did not parse as a known command.
fn is_unknown_command(msg: &Message) -> bool {
    msg.text().is_some_and(|text| text.starts_with('/'))
}

/// Update routing shared by the binary and the dispatcher tests.
pub fn schema() -> UpdateHandler<anyhow::Error> {
    dptree::entry()
        .branch(Update::filter_callback_query().endpoint(callback_handler))
        .branch(
            Update::filter_message()
                .branch(
                    dptree::entry()
                        .filter(|msg: Message| is_invoice_upload(&msg))
                        .endpoint(receive_invoice),
                )
                .branch(dptree::entry().filter_command::<Command>().endpoint(
                    |bot: Bot,
                     msg: Message,
                     cmd: Command,
                     sessions: Sessions,
                     model: Model,
                     delete_after_timeout: u64| async move {
                        cmd.dispatch(bot, msg, sessions, model, delete_after_timeout)
                            .await
                    },
                ))
                .branch(
                    dptree::entry()
                        .filter(|msg: Message| is_unknown_command(&msg))
                        .endpoint(help),
                )
                .branch(dptree::endpoint(answer_question)),
        )
}

pub async fn run() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting BillBot...");

    let config = Config::from_env();
    let ai_config = config.ai.clone().context("GEMINI_API_KEY must be set")?;
    tracing::info!(
        model = %ai_config.model,
        thinking_budget = ai_config.thinking_budget,
        default_language = %config.default_language,
        "Configuration loaded"
    );

    let gateway: Arc<dyn ModelGateway> = Arc::new(GeminiGateway::from_config(&ai_config));
    let model = Model::new(gateway, ai_config.model.clone());
    let sessions = Sessions::new(config.default_language);
    if config.session_idle_timeout > 0 {
        drop(sessions.spawn_eviction(Duration::from_secs(config.session_idle_timeout)));
    }

    let bot = Bot::from_env();
    if let Err(err) = bot.set_my_commands(Command::bot_commands()).await {
        tracing::warn!(error = %err, "Failed to register bot commands");
    }

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![sessions, model, config.delete_after_timeout])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
