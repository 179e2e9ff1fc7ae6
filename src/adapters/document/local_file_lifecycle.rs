//! Local File Lifecycle - deletes rendered artifacts from the output directory.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use crate::domain::session::DocumentReference;
use crate::ports::{FileLifecycle, LifecycleError};

/// Deletes artifacts that live directly under `output_dir`.
#[derive(Debug, Clone)]
pub struct LocalFileLifecycle {
    output_dir: PathBuf,
}

impl LocalFileLifecycle {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Resolves a reference to a path, refusing anything but a bare file name.
    fn resolve(&self, filename: &str) -> Result<PathBuf, LifecycleError> {
        let mut components = Path::new(filename).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.output_dir.join(filename)),
            _ => Err(LifecycleError::OutsideRoot {
                filename: filename.to_string(),
            }),
        }
    }
}

#[async_trait]
impl FileLifecycle for LocalFileLifecycle {
    async fn reclaim(&self, references: &[DocumentReference]) -> Result<usize, LifecycleError> {
        let mut removed = 0;
        let mut first_error = None;

        for reference in references {
            let result = match self.resolve(&reference.filename) {
                Ok(path) => match fs::remove_file(&path).await {
                    Ok(()) => {
                        removed += 1;
                        Ok(())
                    }
                    Err(e) if e.kind() == ErrorKind::NotFound => {
                        debug!(filename = %reference.filename, "Artifact already gone");
                        Ok(())
                    }
                    Err(e) => Err(LifecycleError::DeleteFailed {
                        filename: reference.filename.clone(),
                        message: e.to_string(),
                    }),
                },
                Err(e) => Err(e),
            };

            if let Err(e) = result {
                warn!(error = %e, "Failed to reclaim artifact");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(removed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DocumentId, Timestamp};
    use tempfile::TempDir;

    fn reference(filename: &str) -> DocumentReference {
        DocumentReference::new(
            DocumentId::new(),
            filename,
            Timestamp::from_unix_secs(0),
            "sample",
        )
    }

    #[tokio::test]
    async fn reclaim_deletes_existing_and_skips_missing() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.md"), "x").unwrap();
        let lifecycle = LocalFileLifecycle::new(dir.path());

        let removed = lifecycle
            .reclaim(&[reference("a.md"), reference("gone.md")])
            .await
            .unwrap();

        assert_eq!(removed, 1);
        assert!(!dir.path().join("a.md").exists());
    }

    #[tokio::test]
    async fn reclaim_refuses_paths_outside_output_dir() {
        let dir = TempDir::new().unwrap();
        let lifecycle = LocalFileLifecycle::new(dir.path());

        let err = lifecycle
            .reclaim(&[reference("../etc/passwd")])
            .await
            .unwrap_err();

        assert!(matches!(err, LifecycleError::OutsideRoot { .. }));
    }
}
