use std::fs;
use std::path::{Path, PathBuf};

use timeline_common::PostTable;

use crate::{Result, StoreError};

/// The one snapshot file of a project. Always read and written whole.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Deserialize the snapshot. A present but unreadable file is [`StoreError::Corrupt`].
    pub fn load(&self) -> Result<PostTable> {
        let bytes = fs::read(&self.path).map_err(|source| self.io(source))?;
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace the snapshot with `table`, creating the parent directory if needed.
    pub fn save(&self, table: &PostTable) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| StoreError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let bytes = serde_json::to_vec(table).map_err(StoreError::Encode)?;
        fs::write(&self.path, &bytes).map_err(|source| self.io(source))?;
        tracing::debug!(path = %self.path.display(), rows = table.len(), bytes = bytes.len(), "snapshot.saved");
        Ok(())
    }

    fn io(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
