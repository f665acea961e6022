//! Staging index
//!
//! The index is the durable buffer between `add` and `commit`: a mapping
//! from working-tree path to the blob that path will contribute to the
//! next commit. Staging and committing usually happen in separate
//! processes, so the index lives on disk at `.ait/index` and is reloaded
//! with `rehydrate` before every operation.
//!
//! ## File format
//!
//! A JSON envelope `{ "version": 1, "entries": [...] }`. The version
//! marker gates any future encoding migration. Reads take a shared
//! file lock, writes an exclusive one.

use crate::artifacts::index::INDEX_VERSION;
use crate::artifacts::index::index_entry::IndexEntry;
use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::ops::DerefMut;
use std::path::{Path, PathBuf};

/// On-disk envelope for the staging index
#[derive(Debug, Serialize, Deserialize)]
struct IndexEnvelope {
    version: u32,
    entries: Vec<IndexEntry>,
}

/// Staging area tracking the paths included in the next commit
#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (`.ait/index`)
    path: Box<Path>,
    /// Staged entries keyed by path; the map keeps `entries()` sorted
    entries: BTreeMap<PathBuf, IndexEntry>,
    /// Set when in-memory state has diverged from the file
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entry_by_path(&self, path: &Path) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    pub fn is_tracked(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether in-memory state has diverged from the file
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Load the index from disk, replacing in-memory state
    ///
    /// An absent or empty file is an empty index, not an error.
    ///
    /// # Locking
    ///
    /// Holds a shared lock on the index file while reading.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        if !self.path().exists() {
            self.clear_in_memory();
            std::fs::File::create(self.path())
                .with_context(|| format!("failed to create index file at {:?}", self.path))?;
        }

        let mut index_file = std::fs::OpenOptions::new().read(true).open(self.path())?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)?;

        self.clear_in_memory();

        if lock.deref_mut().metadata()?.len() == 0 {
            return Ok(());
        }

        let mut raw = Vec::new();
        lock.deref_mut().read_to_end(&mut raw)?;

        let envelope: IndexEnvelope = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to decode index file at {:?}", self.path))?;

        if envelope.version != INDEX_VERSION {
            return Err(anyhow!(
                "Unsupported index file version: {}",
                envelope.version
            ));
        }

        for entry in envelope.entries {
            self.entries.insert(entry.name.clone(), entry);
        }

        Ok(())
    }

    /// Record a staged path, overwriting any previous entry for it
    pub fn stage(&mut self, entry: IndexEntry) {
        self.entries.insert(entry.name.clone(), entry);
        self.changed = true;
    }

    /// Remove a staged path; absent paths are silently ignored
    pub fn unstage(&mut self, path: &Path) {
        if self.entries.remove(path).is_some() {
            self.changed = true;
        }
    }

    /// Drop all entries (after a successful commit)
    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            self.changed = true;
        }
        self.entries.clear();
    }

    /// Persist the in-memory state back to the index file
    ///
    /// # Locking
    ///
    /// Holds an exclusive lock on the index file while writing.
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        let mut index_file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(self.path())?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Exclusive, 0, 1)?;

        let envelope = IndexEnvelope {
            version: INDEX_VERSION,
            entries: self.entries.values().cloned().collect(),
        };
        let raw = serde_json::to_vec_pretty(&envelope)?;

        // truncate only once the exclusive lock is held, so a shared-lock
        // reader never observes an empty index file
        lock.deref_mut().set_len(0)?;
        lock.deref_mut().write_all(&raw)?;
        self.changed = false;

        Ok(())
    }

    /// Staged entries in sorted path order
    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    pub fn into_entries(self) -> impl Iterator<Item = IndexEntry> {
        self.entries.into_values()
    }

    fn clear_in_memory(&mut self) {
        self.entries.clear();
        self.changed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object::hash_blob_bytes;
    use pretty_assertions::assert_eq;

    fn entry(name: &str, content: &[u8]) -> IndexEntry {
        IndexEntry::new(
            PathBuf::from(name),
            hash_blob_bytes(content).unwrap(),
            content.len() as u64,
            chrono::Utc::now(),
        )
    }

    #[test]
    fn staged_entries_survive_rehydration() {
        let dir = tempfile::tempdir().unwrap();
        let index_path = dir.path().join("index").into_boxed_path();

        let mut index = Index::new(index_path.clone());
        index.stage(entry("data.csv", b"a,b\n1,2\n"));
        index.stage(entry("model.pt", b"weights"));
        index.write_updates().unwrap();

        let mut reloaded = Index::new(index_path);
        reloaded.rehydrate().unwrap();

        assert_eq!(reloaded.len(), 2);
        let names: Vec<_> = reloaded.entries().map(|e| e.name.clone()).collect();
        assert_eq!(
            names,
            vec![PathBuf::from("data.csv"), PathBuf::from("model.pt")]
        );
    }

    #[test]
    fn rewriting_a_smaller_index_leaves_no_stale_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let index_path = dir.path().join("index").into_boxed_path();

        let mut index = Index::new(index_path.clone());
        index.stage(entry("data/train.csv", b"a"));
        index.stage(entry("data/labels.csv", b"b"));
        index.stage(entry("model.bin", b"c"));
        index.write_updates().unwrap();

        index.clear();
        index.stage(entry("model.bin", b"c"));
        index.write_updates().unwrap();

        let mut reloaded = Index::new(index_path);
        reloaded.rehydrate().unwrap();
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.is_tracked(Path::new("model.bin")));
    }

    #[test]
    fn restaging_a_path_overwrites_its_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = Index::new(dir.path().join("index").into_boxed_path());

        index.stage(entry("m.pkl", b"v1"));
        let updated = entry("m.pkl", b"v2");
        let expected_oid = updated.oid.clone();
        index.stage(updated);

        assert_eq!(index.len(), 1);
        assert_eq!(
            index.entry_by_path(Path::new("m.pkl")).unwrap().oid,
            expected_oid
        );
    }

    #[test]
    fn unstaging_an_absent_path_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = Index::new(dir.path().join("index").into_boxed_path());

        index.unstage(Path::new("ghost.txt"));
        assert!(index.is_empty());
    }

    #[test]
    fn missing_file_rehydrates_to_empty_index() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = Index::new(dir.path().join("index").into_boxed_path());

        index.rehydrate().unwrap();
        assert!(index.is_empty());
    }

    fn clear_drops_all_entries(index: &mut Index) {
        index.clear();
        assert!(index.is_empty());
    }

    #[test]
    fn clear_empties_the_index() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = Index::new(dir.path().join("index").into_boxed_path());
        index.stage(entry("a", b"a"));
        clear_drops_all_entries(&mut index);
    }
}
