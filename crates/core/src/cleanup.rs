use std::path::PathBuf;

use futures::future;
use thiserror::Error;

use crate::config::Settings;
use crate::pairing::map_files;

#[derive(Error, Debug)]
pub enum CleanupError {
    #[error("failed to delete {path}: {source}")]
    Delete {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Delete every local source map after a successful upload. Resolves
/// immediately, touching nothing, when `delete_sourcemaps` is disabled.
/// All deletions run concurrently and are attempted regardless of each
/// other's outcome; only afterwards does the first failure surface.
pub async fn delete_sourcemaps(settings: &Settings) -> Result<(), CleanupError> {
    if !settings.delete_sourcemaps {
        return Ok(());
    }

    log::info!("Deleting sourcemaps");

    let deletions = map_files(&settings.dist_files).into_iter().map(|rel| {
        let path = settings.dist_dir.join(rel);
        async move {
            tokio::fs::remove_file(&path)
                .await
                .map_err(|source| CleanupError::Delete { path, source })
        }
    });

    let results = future::join_all(deletions).await;
    for result in results {
        result?;
    }
    Ok(())
}
