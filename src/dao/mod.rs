/// Snapshot model definitions.
pub mod models;
/// Prompt sources feeding the deck.
pub mod prompts;
/// Snapshot persistence backends.
pub mod snapshot_store;
/// Storage error types shared by the backends.
pub mod storage;
