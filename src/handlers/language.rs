use anyhow::Result;
use teloxide::{
    prelude::*,
    types::{InlineKeyboardButton, InlineKeyboardMarkup},
};

use crate::ai::Model;
use crate::language::Language;
use crate::messages::{language_prompt, language_set, partial_translation, unknown_language};
use crate::session::{reconcile, Reconciliation, Sessions};
use crate::utils::send_transient;

pub const LANGUAGE_CALLBACK_PREFIX: &str = "lang:";
const BUTTONS_PER_ROW: usize = 3;

pub fn language_keyboard(current: Language) -> InlineKeyboardMarkup {
    let rows: Vec<Vec<InlineKeyboardButton>> = Language::ALL
        .chunks(BUTTONS_PER_ROW)
        .map(|row| {
            row.iter()
                .map(|lang| {
                    let label = if *lang == current {
                        format!("✅ {lang}")
                    } else {
                        lang.to_string()
                    };
                    InlineKeyboardButton::callback(label, format!("{LANGUAGE_CALLBACK_PREFIX}{lang}"))
                })
                .collect()
        })
        .collect();
    InlineKeyboardMarkup::new(rows)
}

/// `/language` shows the selector; `/language <name>` switches directly.
pub async fn choose_language(
    bot: Bot,
    msg: Message,
    sessions: &Sessions,
    model: &Model,
    name: String,
    delete_after_timeout: u64,
) -> Result<()> {
    let chat_id = msg.chat.id;
    if name.trim().is_empty() {
        let current = sessions.get(chat_id).await.lock().await.language();
        bot.send_message(chat_id, language_prompt(current))
            .reply_markup(language_keyboard(current))
            .await?;
        return Ok(());
    }

    match name.parse::<Language>() {
        Ok(language) => {
            apply_language(&bot, chat_id, sessions, model, language, delete_after_timeout).await
        }
        Err(err) => {
            bot.send_message(chat_id, unknown_language(&err.0)).await?;
            Ok(())
        }
    }
}

/// Switch the output language and re-render stored answers in it.
pub async fn apply_language(
    bot: &Bot,
    chat_id: ChatId,
    sessions: &Sessions,
    model: &Model,
    language: Language,
    delete_after_timeout: u64,
) -> Result<()> {
    let session = sessions.get(chat_id).await;
    let mut session = session.lock().await;
    session.set_language(language);
    tracing::info!(chat_id = chat_id.0, %language, "Output language selected");
    bot.send_message(chat_id, language_set(language)).await?;

    let outcome = reconcile(&mut *session, model.gateway(), model.id()).await;
    if let Reconciliation::Reconciled {
        language,
        translated,
        total,
        error: Some(_),
    } = &outcome
    {
        send_transient(
            bot,
            chat_id,
            partial_translation(*language, *translated, *total),
            delete_after_timeout,
        )
        .await?;
    }
    if outcome.translated() > 0 {
        if let Some(newest) = session.conversation().newest() {
            bot.send_message(chat_id, newest.answer()).await?;
        }
    }
    Ok(())
}

pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    sessions: Sessions,
    model: Model,
    delete_after_timeout: u64,
) -> Result<()> {
    // Acknowledge first; a translation pass can outlast the callback deadline.
    bot.answer_callback_query(q.id.clone()).await?;

    if let (Some(data), Some(msg)) = (q.data.as_deref(), q.message.as_ref()) {
        if let Some(name) = data.strip_prefix(LANGUAGE_CALLBACK_PREFIX) {
            match name.parse::<Language>() {
                Ok(language) => {
                    apply_language(
                        &bot,
                        msg.chat().id,
                        &sessions,
                        &model,
                        language,
                        delete_after_timeout,
                    )
                    .await?;
                }
                Err(err) => tracing::debug!(%err, "ignoring stale language button"),
            }
        }
    }
    Ok(())
}
