//! Local persistence for fetched timelines.
//!
//! [`SnapshotStore`] reads and writes the single snapshot file.
//! [`CacheLoader`] decides whether a run talks to the provider or reuses it.
use std::path::PathBuf;
use thiserror::Error;
use timeline_social::SocialError;

pub mod loader;
pub mod snapshot;

pub use loader::{CacheLoader, LoadSource};
pub use snapshot::SnapshotStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("fetching timeline failed: {0}")]
    Fetch(#[from] SocialError),

    #[error("snapshot i/o failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but does not hold a snapshot. Delete it or reload.
    #[error("snapshot at {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("encoding snapshot failed: {0}")]
    Encode(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
