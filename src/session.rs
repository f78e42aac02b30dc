pub mod context;
pub mod conversation;
pub mod reconcile;
pub mod registry;

pub use context::{AskError, SessionContext, ValidationError};
pub use conversation::{Conversation, ConversationEntry};
pub use reconcile::{reconcile, Reconciliation};
pub use registry::Sessions;
