//! Storage abstraction for the import pipeline
//!
//! The pipeline and coordinator only ever talk to the store through this
//! trait, so tests can run the full import flow against an in-memory
//! implementation.

use async_trait::async_trait;
use citybike_common::{DatasetKind, NormalizedRecord};

use super::error::ImportResult;

/// Durable completion flag for one dataset kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetState {
    pub kind: DatasetKind,
    pub completed: bool,
}

/// Durable per-file cursor. `next_line` is 1-based and names the next data
/// row to process, so a fresh tracker starts at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileProgress {
    pub file_path: String,
    pub kind: DatasetKind,
    pub next_line: i64,
}

/// Persistence operations the import pipeline depends on.
#[async_trait]
pub trait ImportStore: Send + Sync {
    /// Fetch the state record for a dataset kind, creating it (not completed)
    /// if it does not exist yet.
    async fn dataset_state(&self, kind: DatasetKind) -> ImportResult<DatasetState>;

    /// Mark a dataset kind as fully imported. Idempotent.
    async fn mark_dataset_completed(&self, kind: DatasetKind) -> ImportResult<()>;

    /// Fetch the cursor for a file, registering it at line 1 on first sight.
    /// An existing cursor is never reset.
    async fn get_or_create_tracker(
        &self,
        kind: DatasetKind,
        file_path: &str,
    ) -> ImportResult<FileProgress>;

    /// Read the cursor for a registered file. Fails with
    /// [`ImportError::TrackerNotFound`](super::ImportError::TrackerNotFound)
    /// when the file was never registered.
    async fn current_line(&self, file_path: &str) -> ImportResult<i64>;

    /// Move the cursor forward by exactly one line. Called once per consumed
    /// row, accepted or rejected.
    async fn advance(&self, file_path: &str) -> ImportResult<()>;

    /// Persist one normalized record.
    async fn insert(&self, record: &NormalizedRecord) -> ImportResult<()>;
}
