//! Status report assembly
//!
//! Walks the working tree, hashes every file, and classifies the union of
//! worktree, index, and HEAD paths into untracked files and per-path
//! change pairs.

use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::objects::object::hash_blob_bytes;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::file_change::FileChange;
use crate::artifacts::status::inspector;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

pub type FileSet = BTreeSet<PathBuf>;
pub type ChangeSet = BTreeMap<PathBuf, FileChange>;

#[derive(Debug, Clone, Default)]
pub struct StatusReport {
    /// Present in the working tree, unknown to index and HEAD
    pub untracked: FileSet,
    /// Paths with at least one non-clean dimension
    pub changes: ChangeSet,
    /// Name of the active branch
    pub branch: String,
}

impl StatusReport {
    pub fn is_clean(&self) -> bool {
        self.untracked.is_empty() && self.changes.is_empty()
    }
}

#[derive(new)]
pub struct Status<'r> {
    repository: &'r Repository,
}

impl Status<'_> {
    /// Build the report against a rehydrated index
    pub fn collect(&self, index: &Index) -> anyhow::Result<StatusReport> {
        let worktree = self.hash_worktree()?;
        let head_tree = self.repository.head_tree()?;

        let mut report = StatusReport {
            branch: self.repository.refs().current_ref()?,
            ..Default::default()
        };

        // union of every path any snapshot knows about
        let mut paths = BTreeSet::new();
        paths.extend(worktree.keys().cloned());
        paths.extend(index.entries().map(|e| e.name.clone()));
        paths.extend(head_tree.entries().map(|(p, _)| p.clone()));

        for path in paths {
            let index_entry = index.entry_by_path(&path);
            let head_entry = head_tree.get(&path);
            let worktree_oid = worktree.get(&path);

            if index_entry.is_none() && head_entry.is_none() {
                report.untracked.insert(path);
                continue;
            }

            let change = FileChange {
                staged: inspector::check_index_against_head(index_entry, head_entry),
                worktree: inspector::check_worktree(index_entry, head_entry, worktree_oid),
            };

            if !change.is_clean() {
                report.changes.insert(path, change);
            }
        }

        Ok(report)
    }

    /// Content hash of every working-tree file
    ///
    /// Hashing is the whole point: a touched-but-unchanged file hashes the
    /// same and stays invisible, an edit is caught even when size and
    /// mtime happen to match.
    fn hash_worktree(&self) -> anyhow::Result<BTreeMap<PathBuf, ObjectId>> {
        let workspace = self.repository.workspace();
        let mut hashes = BTreeMap::new();

        for path in workspace.list_files(None)? {
            let content = workspace.read_file(&path)?;
            hashes.insert(path, hash_blob_bytes(&content)?);
        }

        Ok(hashes)
    }
}
