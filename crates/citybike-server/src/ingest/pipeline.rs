//! Per-file import pipeline
//!
//! One pipeline owns one CSV file end to end: open, fast-forward to the
//! durable cursor, then validate / persist / advance one row at a time.
//! The cursor only moves after the row's outcome is settled, so a crash
//! between rows re-processes at most the row in flight.

use std::collections::HashMap;
use std::io::SeekFrom;
use std::path::Path;

use futures::StreamExt;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use citybike_common::DatasetKind;

use super::error::{ImportError, ImportResult};
use super::store::ImportStore;
use super::validator;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Import a single file from its durable cursor to end of stream.
///
/// The file's tracker must already be registered; reading the cursor for an
/// unregistered file is fatal.
pub async fn import_file<S: ImportStore>(
    store: &S,
    kind: DatasetKind,
    file_path: &Path,
) -> ImportResult<()> {
    let path = file_path.to_string_lossy().to_string();
    let start_line = store.current_line(&path).await?;

    tracing::info!(file = %path, start_line, "Starting file import");

    let file = open_past_bom(file_path).await.map_err(|e| ImportError::Stream {
        path: path.clone(),
        source: e.into(),
    })?;

    let mut reader = csv_async::AsyncReaderBuilder::new()
        .has_headers(true)
        .create_deserializer(file);
    let mut rows = reader.deserialize::<HashMap<String, String>>();

    // The header is re-read on every run; the cursor counts data rows only,
    // so resuming at line N means discarding N - 1 data rows.
    let mut remaining = start_line - 1;
    while remaining > 0 {
        if rows.next().await.is_none() {
            // Cursor at or past end of file; a previous run finished it.
            tracing::info!(file = %path, "File already fully imported");
            return Ok(());
        }
        remaining -= 1;
    }

    let mut accepted = 0u64;
    let mut rejected = 0u64;

    while let Some(row) = rows.next().await {
        match row {
            Ok(raw) => match validator::validate_and_normalize(&raw, kind) {
                Ok(record) => {
                    store.insert(&record).await?;
                    store.advance(&path).await?;
                    accepted += 1;
                },
                Err(reason) => {
                    tracing::debug!(file = %path, %reason, "Rejected row");
                    store.advance(&path).await?;
                    rejected += 1;
                },
            },
            Err(e) if is_row_level(&e) => {
                tracing::debug!(file = %path, error = %e, "Skipped unparseable row");
                store.advance(&path).await?;
                rejected += 1;
            },
            Err(e) => {
                return Err(ImportError::Stream { path, source: e });
            },
        }
    }

    tracing::info!(file = %path, accepted, rejected, "File import reached end of stream");

    Ok(())
}

/// A malformed row (wrong field count, bad UTF-8, undeserializable content)
/// is consumed like a rejected one. I/O failures are not row-shaped and
/// abort the file.
fn is_row_level(e: &csv_async::Error) -> bool {
    matches!(
        e.kind(),
        csv_async::ErrorKind::UnequalLengths { .. }
            | csv_async::ErrorKind::Utf8 { .. }
            | csv_async::ErrorKind::Deserialize { .. }
    )
}

/// Open a file positioned after a UTF-8 byte order mark, if one is present.
async fn open_past_bom(path: &Path) -> std::io::Result<File> {
    let mut file = File::open(path).await?;

    let mut prefix = [0u8; 3];
    let mut filled = 0;
    while filled < prefix.len() {
        let n = file.read(&mut prefix[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }

    if filled < prefix.len() || prefix != UTF8_BOM {
        file.seek(SeekFrom::Start(0)).await?;
    }

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_open_past_bom_skips_marker() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"\xEF\xBB\xBFhello").unwrap();

        let mut file = open_past_bom(tmp.path()).await.unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).await.unwrap();
        assert_eq!(content, "hello");
    }

    #[tokio::test]
    async fn test_open_past_bom_keeps_plain_content() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"hello").unwrap();

        let mut file = open_past_bom(tmp.path()).await.unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).await.unwrap();
        assert_eq!(content, "hello");
    }

    #[tokio::test]
    async fn test_open_past_bom_handles_short_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"ab").unwrap();

        let mut file = open_past_bom(tmp.path()).await.unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).await.unwrap();
        assert_eq!(content, "ab");
    }
}
