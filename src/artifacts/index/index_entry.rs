//! Staging index entry
//!
//! One entry per staged path: the blob identity frozen at `add` time, the
//! source file size, and the staging timestamp. Size and timestamp are
//! bookkeeping for display; change detection always goes through content
//! hashes, never through stat data alone.

use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A staged path and the blob it contributes to the next commit
#[derive(Debug, Clone, Serialize, Deserialize, new)]
pub struct IndexEntry {
    /// Path relative to the repository root
    pub name: PathBuf,
    /// Blob identity captured when the path was staged
    pub oid: ObjectId,
    /// Source file size in bytes at staging time
    pub size: u64,
    /// When the path was staged
    pub staged_at: chrono::DateTime<chrono::Utc>,
}

impl PartialEq for IndexEntry {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for IndexEntry {}

impl PartialOrd for IndexEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IndexEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(&other.name)
    }
}
