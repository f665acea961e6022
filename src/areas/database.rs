//! Content-addressed object database
//!
//! Objects are stored write-once under `.ait/objects/<2-hex>/<62-hex>`,
//! keyed by the SHA-256 digest of their canonical encoding. Storing is
//! idempotent: identical content maps to an identical path, so a second
//! store of the same bytes is a no-op and concurrent stores of the same
//! content from separate processes are safe without locking.
//!
//! Writes go to a temp file in the target directory and are renamed into
//! place, so a crash mid-write never leaves a partial object visible under
//! its final identity. Reads re-hash the stored bytes and reject objects
//! whose digest no longer matches their identity.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::error::CoreError;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use sha2::{Digest, Sha256};
use std::io::{BufRead, Cursor, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Persist an object and return its identity
    ///
    /// Idempotent: when an object with the same identity is already on
    /// disk, nothing is written and the existing identity is returned.
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let oid = object.object_id()?;
        let object_path = self.path.join(oid.to_path());

        if !object_path.exists() {
            std::fs::create_dir_all(
                object_path
                    .parent()
                    .context(format!("Invalid object path {}", object_path.display()))?,
            )
            .context(format!(
                "Unable to create object directory {}",
                object_path.display()
            ))?;

            self.write_object(object_path, object.serialize()?)?;
            log::debug!("stored {} {}", object.object_type(), oid);
        }

        Ok(oid)
    }

    pub fn exists(&self, oid: &ObjectId) -> bool {
        self.path.join(oid.to_path()).exists()
    }

    /// Load and verify the raw canonical bytes of an object
    pub fn load(&self, oid: &ObjectId) -> anyhow::Result<Bytes> {
        let object_path = self.path.join(oid.to_path());

        if !object_path.exists() {
            return Err(CoreError::ObjectNotFound(oid.clone()).into());
        }

        let content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        // recompute the digest; a mismatch means on-disk corruption and is
        // fatal for this object, never retried
        let actual = ObjectId::from_digest(&Sha256::digest(&content))?;
        if &actual != oid {
            return Err(CoreError::CorruptObject {
                id: oid.clone(),
                reason: format!("stored bytes hash to {actual}"),
            }
            .into());
        }

        Ok(Bytes::from(content))
    }

    /// Parse an object of any kind
    pub fn parse_object(&self, oid: &ObjectId) -> anyhow::Result<ObjectBox> {
        let (object_type, object_reader) = self.parse_object_as_bytes(oid)?;

        let parsed = match object_type {
            ObjectType::Blob => ObjectBox::Blob(Box::new(
                Blob::deserialize(object_reader).map_err(|e| self.corrupt(oid, e))?,
            )),
            ObjectType::Tree => ObjectBox::Tree(Box::new(
                Tree::deserialize(object_reader).map_err(|e| self.corrupt(oid, e))?,
            )),
            ObjectType::Commit => ObjectBox::Commit(Box::new(
                Commit::deserialize(object_reader).map_err(|e| self.corrupt(oid, e))?,
            )),
        };

        Ok(parsed)
    }

    pub fn parse_object_as_blob(&self, oid: &ObjectId) -> anyhow::Result<Blob> {
        match self.parse_object(oid)? {
            ObjectBox::Blob(blob) => Ok(*blob),
            other => Err(self.kind_mismatch(oid, ObjectType::Blob, other.object_type())),
        }
    }

    pub fn parse_object_as_tree(&self, oid: &ObjectId) -> anyhow::Result<Tree> {
        match self.parse_object(oid)? {
            ObjectBox::Tree(tree) => Ok(*tree),
            other => Err(self.kind_mismatch(oid, ObjectType::Tree, other.object_type())),
        }
    }

    pub fn parse_object_as_commit(&self, oid: &ObjectId) -> anyhow::Result<Commit> {
        match self.parse_object(oid)? {
            ObjectBox::Commit(commit) => Ok(*commit),
            other => Err(self.kind_mismatch(oid, ObjectType::Commit, other.object_type())),
        }
    }

    /// Kind of a stored object without fully parsing it
    pub fn object_type(&self, oid: &ObjectId) -> anyhow::Result<ObjectType> {
        let (object_type, _) = self.parse_object_as_bytes(oid)?;
        Ok(object_type)
    }

    /// Resolve an abbreviated identity to all matching full identities
    ///
    /// Prefixes of 2+ characters only touch one shard directory; shorter
    /// prefixes scan every shard. Multiple matches mean the prefix is
    /// ambiguous and the caller decides how to report that.
    pub fn find_objects_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        let mut matches = Vec::new();

        let scan_dir = |dir_name: &str, matches: &mut Vec<ObjectId>| -> anyhow::Result<()> {
            let dir_path = self.path.join(dir_name);
            if !dir_path.is_dir() {
                return Ok(());
            }

            for entry in std::fs::read_dir(&dir_path)? {
                let entry = entry?;
                let file_name = entry.file_name();
                let full_oid = format!("{}{}", dir_name, file_name.to_string_lossy());

                if full_oid.starts_with(prefix)
                    && let Ok(oid) = ObjectId::try_parse(full_oid)
                {
                    matches.push(oid);
                }
            }

            Ok(())
        };

        if prefix.len() >= 2 {
            scan_dir(&prefix[..2], &mut matches)?;
        } else {
            for i in 0..=255 {
                scan_dir(&format!("{i:02x}"), &mut matches)?;
            }
        }

        Ok(matches)
    }

    fn parse_object_as_bytes(&self, oid: &ObjectId) -> anyhow::Result<(ObjectType, impl BufRead)> {
        let content = self.load(oid)?;
        let mut reader = Cursor::new(content);

        let object_type =
            ObjectType::parse_object_type(&mut reader).map_err(|e| self.corrupt(oid, e))?;

        Ok((object_type, reader))
    }

    fn kind_mismatch(
        &self,
        oid: &ObjectId,
        expected: ObjectType,
        actual: ObjectType,
    ) -> anyhow::Error {
        CoreError::KindMismatch {
            id: oid.clone(),
            expected,
            actual,
        }
        .into()
    }

    fn corrupt(&self, oid: &ObjectId, source: anyhow::Error) -> anyhow::Error {
        CoreError::CorruptObject {
            id: oid.clone(),
            reason: source.to_string(),
        }
        .into()
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let mut file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename makes the write atomic with respect to process crash
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}
