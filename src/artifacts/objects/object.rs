use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use anyhow::Result;
use bytes::Bytes;
use sha2::{Digest, Sha256};
use std::io::BufRead;
use std::path::PathBuf;

/// Serialize into the canonical on-disk encoding
pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

/// Deserialize from the canonical encoding, envelope header already consumed
pub trait Unpackable {
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    fn display(&self) -> String;

    /// The SHA-256 digest of the canonical encoding
    ///
    /// This is the object's name, and because the encoding of trees and
    /// commits embeds child identities, a commit id transitively commits
    /// to its entire history.
    fn object_id(&self) -> Result<ObjectId> {
        let content = self.serialize()?;
        ObjectId::from_digest(&Sha256::digest(&content))
    }

    fn object_path(&self) -> Result<PathBuf> {
        Ok(self.object_id()?.to_path())
    }
}

/// Digest arbitrary bytes as a blob without materializing the object
///
/// Used by status/diff to compare working tree content against staged or
/// committed blobs purely by identity.
pub fn hash_blob_bytes(content: &[u8]) -> Result<ObjectId> {
    Blob::new(Bytes::copy_from_slice(content)).object_id()
}

/// A parsed object of any kind
pub enum ObjectBox {
    Blob(Box<Blob>),
    Tree(Box<Tree>),
    Commit(Box<Commit>),
}

impl ObjectBox {
    pub fn object_type(&self) -> ObjectType {
        match self {
            ObjectBox::Blob(_) => ObjectType::Blob,
            ObjectBox::Tree(_) => ObjectType::Tree,
            ObjectBox::Commit(_) => ObjectType::Commit,
        }
    }

    pub fn display(&self) -> String {
        match self {
            ObjectBox::Blob(blob) => blob.display(),
            ObjectBox::Tree(tree) => tree.display(),
            ObjectBox::Commit(commit) => commit.display(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_content_hashes_identically() {
        let a = Blob::new(Bytes::from_static(b"a,b\n1,2\n"));
        let b = Blob::new(Bytes::from_static(b"a,b\n1,2\n"));

        assert_eq!(a.object_id().unwrap(), b.object_id().unwrap());
    }

    #[test]
    fn different_content_hashes_differently() {
        let a = Blob::new(Bytes::from_static(b"weights-v1"));
        let b = Blob::new(Bytes::from_static(b"weights-v2"));

        assert_ne!(a.object_id().unwrap(), b.object_id().unwrap());
    }

    #[test]
    fn hash_blob_bytes_matches_blob_identity() {
        let content = b"epoch,loss\n1,0.5\n";
        let blob = Blob::new(Bytes::copy_from_slice(content));

        assert_eq!(
            hash_blob_bytes(content).unwrap(),
            blob.object_id().unwrap()
        );
    }
}
