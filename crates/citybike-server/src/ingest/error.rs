//! Import error taxonomy
//!
//! Row-level problems (validation rejections, unparseable lines) never become
//! errors at this level; they are consumed inside the pipeline, which advances
//! the cursor and moves on. Everything here is fatal to at least one file.

use thiserror::Error;

/// Result type alias for import operations
pub type ImportResult<T> = std::result::Result<T, ImportError>;

/// Fatal import errors
#[derive(Error, Debug)]
pub enum ImportError {
    /// Progress was read for a file that was never registered. This is a
    /// contract violation by the caller (create-before-read), not a
    /// recoverable runtime condition.
    #[error("No file progress tracker for {file_path}")]
    TrackerNotFound { file_path: String },

    /// The dataset directory listing failed. Fatal for the whole kind; no
    /// trackers or pipelines were started.
    #[error("Failed to list dataset directory {path}: {source}")]
    Discovery {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The byte stream or parser failed at the file level (not a single
    /// skippable row). Fatal for that file's pipeline only.
    #[error("Stream error in {path}: {source}")]
    Stream {
        path: String,
        #[source]
        source: csv_async::Error,
    },

    /// Persisting a record or cursor failed. Fatal for that file's pipeline;
    /// the dataset stays incomplete and the next run resumes from the cursor.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for ImportError {
    fn from(e: sqlx::Error) -> Self {
        ImportError::Storage(e.to_string())
    }
}
