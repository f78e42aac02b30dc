//! Instructions sent to the model.
//!
//! Centralizing these strings keeps the contract with the model (column
//! schema, sentinel answers, redirect lines) in one place. The normalizer
//! relies on the exact header and sentinels written here.

use crate::invoice::table::CSV_HEADER;
use crate::language::Language;

/// Whole-response answer meaning "the invoice has no line items".
pub const SENTINEL_NO_ITEMS: &str = "0";
/// Whole-response answer meaning "the image is not legible".
pub const SENTINEL_UNREADABLE: &str = "1";

pub const NOT_AN_INVOICE_LINE: &str = "Looks like this is not an invoice";
pub const OFF_TOPIC_LINE: &str = "Please ask about invoice";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptMode {
    Extract,
    Answer,
    Translate,
}

pub fn build_prompt(mode: PromptMode, language: Language) -> String {
    match mode {
        PromptMode::Extract => extract_prompt(language),
        PromptMode::Answer => answer_prompt(language),
        PromptMode::Translate => translate_prompt(language),
    }
}

/// The user turn that follows the answer prompt and the invoice image.
pub fn question_part(question: &str) -> String {
    format!("User: {}", question.trim())
}

fn extract_prompt(language: Language) -> String {
    format!(
        "You are an expert at reading invoices.\n\
         From the uploaded image, extract the list of items in tabular form with these columns:\n\
         Item Number, Item Name, Item Price, Total Tax amount, Total Price.\n\
         Also extract the Total Bill amount.\n\
         Return the output strictly in this format:\n\
         \n\
         {CSV_HEADER}\n\
         1,Paracetamol 500mg,50,5,55\n\
         2,Aspirin 100mg,100,10,110\n\
         3,Ibuprofen 200mg,150,0,150\n\
         ,Total,300,15,315\n\
         \n\
         If there is no tax on an item then the Total Tax amount field value should be 0.\n\
         Numbers must be plain decimals without currency symbols or thousands separators.\n\
         If an item name contains a comma, wrap it in double quotes.\n\
         \n\
         Item names should be in {language} language.\n\
         \n\
         Only return this structured CSV-style text. No explanation.\n\
         If there are no items, return only one thing that is: \"{SENTINEL_NO_ITEMS}\".\n\
         If the image is not clear, return only one thing that is: \"{SENTINEL_UNREADABLE}\"."
    )
}

fn answer_prompt(language: Language) -> String {
    format!(
        "You are an expert in understanding invoices.\n\
         An image of an invoice will be uploaded.\n\
         It may be in any language,\n\
         and you will have to answer any question based on the uploaded image.\n\
         Avoid using phrases like \"based on the image/invoice provided\".\n\
         \n\
         You are a professional translator also.\n\
         Give the whole answer in {language} language only. Keep technical terms (like numbers, tax IDs, currency) as they are.\n\
         Please don't show this is a translation. Just give the translated text.\n\
         Note that if the image is not about any invoice, then return only one line: \"{NOT_AN_INVOICE_LINE}\" in {language} language.\n\
         Also if the query is out of context to the invoice, then return only one line: \"{OFF_TOPIC_LINE}\" in {language} language."
    )
}

fn translate_prompt(language: Language) -> String {
    format!(
        "You are a professional translator.\n\
         Translate the response to {language} language only. Keep numbers and technical terms (like GSTIN, PAN, amounts) unchanged.\n\
         Don't mention that this is a translation, give only the translated output.\n\
         If the response is already in {language}, return it as is.\n\
         All things should be in {language} language, including names."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_prompt_embeds_schema_and_sentinels() {
        let p = build_prompt(PromptMode::Extract, Language::English);
        assert!(p.contains("Item Number,Item Name,Item Price,Total Tax amount,Total Price\n1,"));
        assert!(p.contains(",Total,300,15,315"));
        assert!(p.contains("If there are no items, return only one thing that is: \"0\"."));
        assert!(p.contains("If the image is not clear, return only one thing that is: \"1\"."));
    }

    #[test]
    fn extract_prompt_localizes_item_names() {
        let p = build_prompt(PromptMode::Extract, Language::Marathi);
        assert!(p.contains("Item names should be in Marathi language."));
    }

    #[test]
    fn answer_prompt_has_both_redirects() {
        let p = build_prompt(PromptMode::Answer, Language::Hindi);
        assert!(p.contains("\"Looks like this is not an invoice\" in Hindi language"));
        assert!(p.contains("\"Please ask about invoice\" in Hindi language"));
    }

    #[test]
    fn translate_prompt_keeps_identifiers_and_noops() {
        let p = build_prompt(PromptMode::Translate, Language::Urdu);
        assert!(p.contains("Keep numbers and technical terms"));
        assert!(p.contains("Don't mention that this is a translation"));
        assert!(p.contains("If the response is already in Urdu, return it as is."));
    }

    #[test]
    fn prompts_are_deterministic() {
        for mode in [PromptMode::Extract, PromptMode::Answer, PromptMode::Translate] {
            assert_eq!(
                build_prompt(mode, Language::Tamil),
                build_prompt(mode, Language::Tamil)
            );
        }
    }

    #[test]
    fn question_part_is_trimmed() {
        assert_eq!(question_part("  total? "), "User: total?");
    }
}
