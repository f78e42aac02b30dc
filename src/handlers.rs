pub mod help;
pub mod history;
pub mod items;
pub mod language;
pub mod question;
pub mod reset;
pub mod upload;

pub use help::help;
pub use history::{format_history, show_history};
pub use items::{present_extraction, send_items};
pub use language::{apply_language, callback_handler, choose_language, language_keyboard};
pub use question::answer_question;
pub use reset::reset_session;
pub use upload::receive_invoice;
