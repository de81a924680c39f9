//! Snapshot persistence.
//!
//! The snapshot is a single flat JSON file used as fallback input when
//! live fetching fails or is disabled:
//!
//! ```json
//! {
//!   "tweets": [
//!     { "username": "alice", "tweet": "hello", "replies": ["hi there"] }
//!   ]
//! }
//! ```
//!
//! `save` overwrites the whole file each call; there is no merging with
//! prior contents.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Post, PostCollection};

/// A file at or below this byte size is treated as missing (`{}` or less).
const MIN_SNAPSHOT_BYTES: u64 = 2;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("snapshot missing or empty: {}", path.display())]
    MissingOrEmpty { path: PathBuf },

    #[error("malformed snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// On-disk shape. The top-level `tweets` key is required; its absence is
/// a parse failure, not an empty collection.
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
    tweets: Vec<Post>,
}

/// Reads and writes the snapshot file. Pure serialization, no business
/// logic.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the snapshot with the full collection.
    pub fn save(&self, collection: &PostCollection) -> Result<(), SnapshotError> {
        let file = SnapshotFile {
            tweets: collection.posts().to_vec(),
        };
        let json = serde_json::to_string(&file)?;
        std::fs::write(&self.path, json)?;
        tracing::info!(path = %self.path.display(), posts = collection.len(), "snapshot saved");
        Ok(())
    }

    /// Load the snapshot, preserving author, post, and reply order.
    pub fn load(&self) -> Result<PostCollection, SnapshotError> {
        let size = match std::fs::metadata(&self.path) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SnapshotError::MissingOrEmpty {
                    path: self.path.clone(),
                })
            }
            Err(e) => return Err(e.into()),
        };

        if size <= MIN_SNAPSHOT_BYTES {
            return Err(SnapshotError::MissingOrEmpty {
                path: self.path.clone(),
            });
        }

        let content = std::fs::read_to_string(&self.path)?;
        let file: SnapshotFile = serde_json::from_str(&content)?;

        tracing::info!(path = %self.path.display(), posts = file.tweets.len(), "snapshot loaded");
        Ok(file.tweets.into_iter().collect())
    }
}
