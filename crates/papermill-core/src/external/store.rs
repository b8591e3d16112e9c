//! Ephemeral on-disk artifacts
//!
//! External tools only speak files, so inputs are staged to disk and
//! results read back. Every artifact is scoped to exactly one request
//! and must be gone by the time that request finishes, whatever path it
//! took — explicit deletes on the happy path, `Drop` as the backstop on
//! every other one.
//!
//! Artifact names are opaque v4 UUIDs, never wall-clock derived, so
//! concurrent requests can share the same root directory without ever
//! aliasing a path.

use crate::error::PdfToolError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Factory for temp artifacts under a configured root directory.
///
/// The root is created lazily on first use; cloning the store is cheap
/// and shares the same root.
#[derive(Debug, Clone)]
pub struct TempStore {
    root: PathBuf,
}

impl TempStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reserve a uniquely named artifact with the given extension. The
    /// file itself is created by the first write.
    pub async fn create(&self, extension: &str) -> Result<TempArtifact, PdfToolError> {
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.root.join(format!("{}.{}", Uuid::new_v4(), extension));
        Ok(TempArtifact { path })
    }

    /// Create a uniquely named subdirectory for artifacts that must keep
    /// an exact caller-chosen filename (conversion output naming depends
    /// on the input's base name). The whole directory goes away when the
    /// scope is dropped.
    pub async fn scope(&self) -> Result<TempScope, PdfToolError> {
        let dir = self.root.join(Uuid::new_v4().to_string());
        tokio::fs::create_dir_all(&dir).await?;
        Ok(TempScope { dir })
    }
}

/// A single temp file. Removed on drop if still present.
#[derive(Debug)]
pub struct TempArtifact {
    path: PathBuf,
}

impl TempArtifact {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn write(&self, bytes: &[u8]) -> Result<(), PdfToolError> {
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }

    pub async fn read(&self) -> Result<Vec<u8>, PdfToolError> {
        Ok(tokio::fs::read(&self.path).await?)
    }

    /// Remove the file. Idempotent: a file that was never written or is
    /// already gone is not an error.
    pub async fn delete(&self) -> Result<(), PdfToolError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "leaked temp artifact");
            }
        }
    }
}

/// A request-scoped temp directory. Removed recursively on drop.
#[derive(Debug)]
pub struct TempScope {
    dir: PathBuf,
}

impl TempScope {
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// An artifact with an exact name inside this scope.
    pub fn artifact(&self, name: &str) -> TempArtifact {
        TempArtifact {
            path: self.dir.join(name),
        }
    }
}

impl Drop for TempScope {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.dir) {
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!(dir = %self.dir.display(), error = %e, "leaked temp scope");
            }
        }
    }
}
