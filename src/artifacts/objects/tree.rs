//! Tree object
//!
//! A tree is the snapshot a commit points at: a flat, path-keyed mapping
//! from staged relative paths to blob identities. Artifact repositories
//! track `data/train.csv` as one key, not as nested directory objects,
//! and the flat shape is applied consistently so tree hashes stay stable.
//!
//! Entries carry an explicit kind tag even though every child is a blob
//! today, so nested trees can be introduced without re-encoding history.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `<kind> <path>\0<32-byte-sha256>`
//!
//! Entries are kept in a `BTreeMap`, so serialization order is the sorted
//! path order regardless of insertion order. Two trees with the same
//! entries always hash identically.

use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// A single tree entry: child kind and identity
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct TreeEntry {
    pub kind: ObjectType,
    pub oid: ObjectId,
}

/// Snapshot object mapping staged paths to blob identities
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: BTreeMap<PathBuf, TreeEntry>,
}

impl Tree {
    /// Fold staging index entries into a tree
    ///
    /// The index iterates in sorted path order, but the `BTreeMap` makes
    /// the hash order-independent even for callers that do not.
    pub fn build<'e>(entries: impl Iterator<Item = &'e IndexEntry>) -> Self {
        let mut tree = Self::default();

        for entry in entries {
            tree.add_entry(entry.name.clone(), entry.oid.clone());
        }

        tree
    }

    pub fn add_entry(&mut self, path: PathBuf, oid: ObjectId) {
        self.entries
            .insert(path, TreeEntry::new(ObjectType::Blob, oid));
    }

    pub fn get(&self, path: &Path) -> Option<&TreeEntry> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&PathBuf, &TreeEntry)> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> impl Iterator<Item = (PathBuf, TreeEntry)> {
        self.entries.into_iter()
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content_bytes = Vec::new();

        for (path, entry) in &self.entries {
            let path = path
                .to_str()
                .with_context(|| format!("Non-UTF-8 path in tree: {}", path.display()))?;

            let header = format!("{} {}", entry.kind.as_str(), path);
            content_bytes.write_all(header.as_bytes())?;
            content_bytes.push(0);
            entry.oid.write_raw_to(&mut content_bytes)?;
        }

        let mut tree_bytes = Vec::with_capacity(content_bytes.len() + 16);
        let header = format!("{} {}\0", self.object_type().as_str(), content_bytes.len());
        tree_bytes.write_all(header.as_bytes())?;
        tree_bytes.write_all(&content_bytes)?;

        Ok(Bytes::from(tree_bytes))
    }
}

impl Unpackable for Tree {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let mut entries = BTreeMap::new();
        let mut reader = reader;

        let mut kind_bytes = Vec::new();
        let mut path_bytes = Vec::new();

        loop {
            kind_bytes.clear();
            let n = reader.read_until(b' ', &mut kind_bytes)?;
            if n == 0 {
                break; // clean EOF, no more entries
            }
            if *kind_bytes.last().unwrap() != b' ' {
                return Err(anyhow::anyhow!("unexpected EOF in tree entry kind"));
            }
            kind_bytes.pop();
            let kind = ObjectType::try_from(std::str::from_utf8(&kind_bytes)?)?;

            path_bytes.clear();
            let n = reader.read_until(b'\0', &mut path_bytes)?;
            if n == 0 || *path_bytes.last().unwrap() != b'\0' {
                return Err(anyhow::anyhow!("unexpected EOF in tree entry path"));
            }
            path_bytes.pop();
            let path = PathBuf::from(std::str::from_utf8(&path_bytes)?);

            let oid = ObjectId::read_raw_from(&mut reader)
                .context("unexpected EOF in tree entry object id")?;

            entries.insert(path, TreeEntry::new(kind, oid));
        }

        Ok(Tree { entries })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.entries
            .iter()
            .map(|(path, entry)| {
                format!("{} {}\t{}", entry.kind.as_str(), entry.oid, path.display())
            })
            .collect::<Vec<String>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object::hash_blob_bytes;

    fn oid_for(content: &[u8]) -> ObjectId {
        hash_blob_bytes(content).unwrap()
    }

    #[test]
    fn hash_is_independent_of_insertion_order() {
        let mut forward = Tree::default();
        forward.add_entry(PathBuf::from("a.csv"), oid_for(b"a"));
        forward.add_entry(PathBuf::from("b.pkl"), oid_for(b"b"));
        forward.add_entry(PathBuf::from("c.onnx"), oid_for(b"c"));

        let mut reversed = Tree::default();
        reversed.add_entry(PathBuf::from("c.onnx"), oid_for(b"c"));
        reversed.add_entry(PathBuf::from("b.pkl"), oid_for(b"b"));
        reversed.add_entry(PathBuf::from("a.csv"), oid_for(b"a"));

        assert_eq!(
            forward.object_id().unwrap(),
            reversed.object_id().unwrap()
        );
    }

    #[test]
    fn serialization_round_trip() {
        let mut tree = Tree::default();
        tree.add_entry(PathBuf::from("data/train.csv"), oid_for(b"1,2,3"));
        tree.add_entry(PathBuf::from("model.pt"), oid_for(b"weights"));

        let bytes = tree.serialize().unwrap();
        let mut reader = std::io::Cursor::new(bytes);
        let kind = ObjectType::parse_object_type(&mut reader).unwrap();
        let parsed = Tree::deserialize(reader).unwrap();

        assert_eq!(kind, ObjectType::Tree);
        assert_eq!(parsed, tree);
    }

    #[test]
    fn different_entries_produce_different_hashes() {
        let mut a = Tree::default();
        a.add_entry(PathBuf::from("x"), oid_for(b"x"));

        let mut b = Tree::default();
        b.add_entry(PathBuf::from("x"), oid_for(b"y"));

        assert_ne!(a.object_id().unwrap(), b.object_id().unwrap());
    }
}
