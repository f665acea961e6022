//! Snapshot-level change detection
//!
//! The core answers one question per path: does the content differ between
//! two snapshots, and in which direction. Rendering line-level patches is
//! a presentation concern left to consumers; identities are enough to
//! fetch both sides from the database.

use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::objects::object::hash_blob_bytes;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Which pair of snapshots to compare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffTarget {
    /// Working tree against the staging index
    WorktreeVsIndex,
    /// Staging index against the HEAD tree (`--cached`)
    IndexVsHead,
}

/// One differing path with the identity on each side
///
/// `None` on a side means the path is absent from that snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffEntry {
    pub path: PathBuf,
    pub old_oid: Option<ObjectId>,
    pub new_oid: Option<ObjectId>,
}

impl DiffEntry {
    pub fn is_addition(&self) -> bool {
        self.old_oid.is_none() && self.new_oid.is_some()
    }

    pub fn is_deletion(&self) -> bool {
        self.old_oid.is_some() && self.new_oid.is_none()
    }
}

/// Compare two snapshots, optionally restricted to one path
///
/// Only differing paths are returned, sorted by path.
pub fn snapshot_diff(
    repository: &Repository,
    index: &Index,
    target: DiffTarget,
    path_filter: Option<&Path>,
) -> anyhow::Result<Vec<DiffEntry>> {
    let mut entries = Vec::new();

    match target {
        DiffTarget::WorktreeVsIndex => {
            for entry in index.entries() {
                if !matches_filter(&entry.name, path_filter) {
                    continue;
                }

                let new_oid = match repository.workspace().file_exists(&entry.name) {
                    true => {
                        let content = repository.workspace().read_file(&entry.name)?;
                        Some(hash_blob_bytes(&content)?)
                    }
                    false => None,
                };

                if new_oid.as_ref() != Some(&entry.oid) {
                    entries.push(DiffEntry {
                        path: entry.name.clone(),
                        old_oid: Some(entry.oid.clone()),
                        new_oid,
                    });
                }
            }
        }
        DiffTarget::IndexVsHead => {
            let head_tree = repository.head_tree()?;

            let mut paths = BTreeSet::new();
            paths.extend(index.entries().map(|e| e.name.clone()));
            paths.extend(head_tree.entries().map(|(p, _)| p.clone()));

            for path in paths {
                if !matches_filter(&path, path_filter) {
                    continue;
                }

                let old_oid = head_tree.get(&path).map(|e| e.oid.clone());
                let new_oid = index.entry_by_path(&path).map(|e| e.oid.clone());

                // a committed path with nothing staged is simply not part
                // of the next commit, not a pending deletion
                if new_oid.is_none() {
                    continue;
                }

                if old_oid != new_oid {
                    entries.push(DiffEntry {
                        path,
                        old_oid,
                        new_oid,
                    });
                }
            }
        }
    }

    Ok(entries)
}

fn matches_filter(path: &Path, filter: Option<&Path>) -> bool {
    match filter {
        Some(filter) => path == filter || path.starts_with(filter),
        None => true,
    }
}
