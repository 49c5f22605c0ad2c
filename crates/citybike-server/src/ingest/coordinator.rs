//! Dataset import coordination
//!
//! The coordinator owns the lifecycle of one dataset kind: check the durable
//! completion flag, discover files, register trackers, run every file's
//! pipeline concurrently, and flip the flag only when every file finished.

use std::path::{Path, PathBuf};

use citybike_common::DatasetKind;

use super::error::{ImportError, ImportResult};
use super::pipeline;
use super::store::ImportStore;

/// Import every file of one dataset kind.
///
/// A kind whose completion flag is already set is a no-op. Any file failure
/// leaves the flag unset so the next run resumes from the durable cursors;
/// the other files still run to completion first.
pub async fn import_kind<S: ImportStore>(
    store: &S,
    datasets_dir: &Path,
    kind: DatasetKind,
) -> ImportResult<()> {
    let state = store.dataset_state(kind).await?;
    if state.completed {
        tracing::info!(%kind, "Dataset already imported, skipping");
        return Ok(());
    }

    let dir = datasets_dir.join(kind.dataset_dir());
    let files = discover_files(&dir).await?;
    tracing::info!(%kind, files = files.len(), dir = %dir.display(), "Discovered dataset files");

    // Register every tracker before any pipeline starts, so a pipeline never
    // reads a cursor that does not exist.
    for file in &files {
        store.get_or_create_tracker(kind, &file.to_string_lossy()).await?;
    }

    let pipelines = files.iter().map(|file| pipeline::import_file(store, kind, file));
    let results = futures::future::join_all(pipelines).await;

    let mut first_error = None;
    for result in results {
        if let Err(e) = result {
            tracing::error!(%kind, error = %e, "File import failed");
            if first_error.is_none() {
                first_error = Some(e);
            }
        }
    }

    if let Some(e) = first_error {
        return Err(e);
    }

    store.mark_dataset_completed(kind).await?;
    tracing::info!(%kind, files = files.len(), "Dataset import completed");

    Ok(())
}

/// Import both dataset kinds concurrently. The kinds are independent; one
/// failing does not stop the other.
pub async fn import_all<S: ImportStore>(store: &S, datasets_dir: &Path) -> ImportResult<()> {
    let (stations, journeys) = futures::future::join(
        import_kind(store, datasets_dir, DatasetKind::Station),
        import_kind(store, datasets_dir, DatasetKind::Journey),
    )
    .await;

    stations.and(journeys)
}

/// List the `.csv` files directly under `dir`, sorted by path for a stable
/// launch order.
async fn discover_files(dir: &Path) -> ImportResult<Vec<PathBuf>> {
    let discovery_err = |source| ImportError::Discovery {
        path: dir.display().to_string(),
        source,
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(discovery_err)?;

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(discovery_err)? {
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("csv") {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
