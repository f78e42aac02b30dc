//! Shared text sent by the bot.
//!
//! Keep all user-facing strings in this module so they stay in one place and are
//! easy to update or translate.

use crate::language::Language;

pub const HELP_TEXT: &str = "<b>BillBot</b>: ask questions about an invoice, get answers in your language.\n\n\
     Send me a photo of an invoice (or a JPG/PNG file). I will extract its items \
     into a CSV file you can download.\n\
     Then send any text message to ask a question about the invoice.\n\n\
     <b>Commands:</b>\n\
     /language - Choose the output language (e.g. /language Hindi).\n\
     /items - Download the extracted items as CSV.\n\
     /history - Show previous questions and answers.\n\
     /reset - Clear the invoice, items, chat history and language.";

pub const UPLOAD_RECEIVED: &str = "📁 File uploaded successfully! Extracting items from invoice... Please wait.";
pub const UNSUPPORTED_FILE: &str = "Please send a JPG or PNG image of the invoice.";
pub const UPLOAD_FIRST: &str = "Upload Invoice first";
pub const NO_ITEMS_FOUND: &str = "⚠️ No items found in the invoice. Please check the invoice.";
pub const IMAGE_UNCLEAR: &str = "⚠️ Items can not be extracted, please upload a clearer image.";
pub const EXTRACTION_FAILED: &str = "🔧 Items not extracted due to some technical issue.";
pub const TRY_LATER: &str = "⌛ Please try after some time.";

pub const ASK_NEEDS_IMAGE: &str =
    "Please upload an invoice image before starting the conversation.";
pub const EMPTY_QUESTION: &str = "Please type a question about the invoice.";
pub const REQUEST_LIMIT: &str = "⌛ Request limit exceeded. Please wait for a while.";

pub const TRANSLATION_LIMIT: &str = "⚠️ Limit exceeded. Please try again later.";
pub const HISTORY_EMPTY: &str = "No questions asked yet.";
pub const HISTORY_HEADER: &str = "Chat History";
pub const RESET_DONE: &str = "🧹 All data cleared. Upload a new invoice to start again.";

pub fn items_caption(count: usize) -> String {
    format!("Extracted {count} item(s). Download as CSV.")
}

pub fn language_prompt(current: Language) -> String {
    format!("🌐 Output language: {current}. Choose a new one:")
}

pub fn language_set(language: Language) -> String {
    format!("🌐 Output language set to {language}.")
}

pub fn unknown_language(name: &str) -> String {
    let supported: Vec<&str> = Language::ALL.iter().map(|l| l.name()).collect();
    format!(
        "Unknown language: {name}.\nSupported: {}",
        supported.join(", ")
    )
}

pub fn partial_translation(language: Language, translated: usize, total: usize) -> String {
    format!("{TRANSLATION_LIMIT}\nTranslated {translated} of {total} answer(s) to {language}.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_translation_names_target_language() {
        let text = partial_translation(Language::Marathi, 1, 3);
        assert!(text.starts_with(TRANSLATION_LIMIT));
        assert!(text.ends_with("Translated 1 of 3 answer(s) to Marathi."));
    }
}
