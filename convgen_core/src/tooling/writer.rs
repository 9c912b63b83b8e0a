//! Destinations for generated artifacts.

use crate::config::ConvgenConfig;
use crate::emitter::GeneratedArtifact;
use crate::error::{ConvgenError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info};

/// Accepts finished artifacts. Every artifact is written in one piece.
pub trait ArtifactWriter: Send + Sync {
    /// Writes `artifact` and returns where it went.
    fn write(&self, artifact: &GeneratedArtifact) -> Result<PathBuf>;
}

/// Writes artifacts below an output root, one file per artifact at
/// `<root>/<package path>/<base name>.<extension>`.
#[derive(Debug, Clone)]
pub struct FsArtifactWriter {
    root: PathBuf,
    extension: String,
}

impl FsArtifactWriter {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    pub fn from_config(config: &ConvgenConfig) -> Self {
        Self::new(config.output_path(), config.output.file_extension.clone())
    }
}

impl ArtifactWriter for FsArtifactWriter {
    fn write(&self, artifact: &GeneratedArtifact) -> Result<PathBuf> {
        let path = artifact.path_under(&self.root, &self.extension);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&path, &artifact.text)?;
        info!(
            declaration = %artifact.declaration,
            source = ?artifact.source_file,
            "Wrote {} bytes to {:?}",
            artifact.text.len(),
            path
        );
        Ok(path)
    }
}

/// Keeps artifacts in memory, keyed by relative path. Used for dry runs and
/// tests. Writing the same path twice is an error.
#[derive(Debug, Default)]
pub struct MemoryArtifactWriter {
    extension: String,
    files: Mutex<BTreeMap<PathBuf, BufferedFile>>,
}

#[derive(Debug, Clone)]
struct BufferedFile {
    declaration: String,
    text: String,
}

impl MemoryArtifactWriter {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            files: Mutex::new(BTreeMap::new()),
        }
    }

    /// Snapshot of everything written so far.
    pub fn files(&self) -> BTreeMap<PathBuf, String> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(path, file)| (path.clone(), file.text.clone()))
            .collect()
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path.as_ref())
            .map(|file| file.text.clone())
    }

    pub fn len(&self) -> usize {
        self.files.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ArtifactWriter for MemoryArtifactWriter {
    fn write(&self, artifact: &GeneratedArtifact) -> Result<PathBuf> {
        let path = artifact.relative_path(&self.extension);
        let mut files = self.files.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = files.get(&path) {
            return Err(ConvgenError::ArtifactCollision {
                artifact: path.display().to_string(),
                first: existing.declaration.clone(),
                second: artifact.declaration.clone(),
            });
        }

        debug!(
            declaration = %artifact.declaration,
            source = ?artifact.source_file,
            "Buffered artifact {:?}",
            path
        );
        files.insert(
            path.clone(),
            BufferedFile {
                declaration: artifact.declaration.clone(),
                text: artifact.text.clone(),
            },
        );
        Ok(path)
    }
}
