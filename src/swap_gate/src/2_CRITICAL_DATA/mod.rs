//! Critical Data - Settled transaction records
//! Source of truth for what each requester has swapped

pub mod transaction_history;

// Re-export commonly used items
pub use transaction_history::{KeyValueStore, MemoryKeyValueStore, TransactionHistory};
