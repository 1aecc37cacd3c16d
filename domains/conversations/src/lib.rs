//! Conversations domain: buffered message log and digest settings

pub mod domain;
pub mod store;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{BufferedMessage, ConversationSettings, DEFAULT_DIGEST_THRESHOLD};

// Re-export store types
pub use store::memory::MemoryConversationStore;
pub use store::postgres::PgConversationStore;
pub use store::retry::RetryingStore;
pub use store::ConversationStore;
