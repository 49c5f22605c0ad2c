//! Import status query
//!
//! Read-only view over the durable import bookkeeping: one completion flag
//! per dataset kind plus the line cursor of every registered file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppResult;

/// Completion flag for one dataset kind
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DatasetStatus {
    pub kind: String,
    pub completed: bool,
    pub updated_at: DateTime<Utc>,
}

/// Cursor position for one registered file
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FileStatus {
    pub file_path: String,
    pub kind: String,
    pub next_line: i64,
    pub updated_at: DateTime<Utc>,
}

/// Full import status report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportStatus {
    pub datasets: Vec<DatasetStatus>,
    pub files: Vec<FileStatus>,
}

pub async fn handle(pool: &PgPool) -> AppResult<ImportStatus> {
    let datasets = sqlx::query_as::<_, DatasetStatus>(
        "SELECT kind, completed, updated_at FROM dataset_import_state ORDER BY kind",
    )
    .fetch_all(pool)
    .await?;

    let files = sqlx::query_as::<_, FileStatus>(
        "SELECT file_path, kind, next_line, updated_at FROM file_progress ORDER BY file_path",
    )
    .fetch_all(pool)
    .await?;

    Ok(ImportStatus { datasets, files })
}
