use crate::error::CoreError;
use crate::models::CompletionRecord;
use async_trait::async_trait;

pub mod json;
pub mod sqlite;

pub use json::{write_atomic, JsonFileRepository};
pub use sqlite::SqliteRepository;

/// Durable home of the completion ledger.
///
/// The ledger is moved as a whole: loaded in full at startup and saved in
/// full after every mutation. There is no incremental log.
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    async fn load_records(&self) -> Result<Vec<CompletionRecord>, CoreError>;
    /// Replaces everything stored with `records`.
    async fn save_records(&self, records: &[CompletionRecord]) -> Result<(), CoreError>;
}
