//! Structured failure taxonomy
//!
//! Every area reports failures through these variants so callers can tell
//! a missing object from a corrupt one, or lock contention from a real
//! error. They travel inside `anyhow::Error` and can be recovered with
//! `downcast_ref` where a caller needs to branch on the kind.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("object {0} not found in the object database")]
    ObjectNotFound(ObjectId),

    #[error("object {id} has kind {actual}, expected {expected}")]
    KindMismatch {
        id: ObjectId,
        expected: ObjectType,
        actual: ObjectType,
    },

    /// The stored bytes fail to decode or their recomputed digest
    /// disagrees with their identity. Not retriable.
    #[error("object {id} is corrupt: {reason}")]
    CorruptObject { id: ObjectId, reason: String },

    #[error("ref '{0}' not found")]
    RefNotFound(String),

    #[error("ref '{0}' already exists")]
    RefExists(String),

    #[error("repository already initialized at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("nothing to commit (staging index is empty)")]
    NothingToCommit,

    #[error("repository is locked by another process")]
    RepositoryLocked,

    #[error("path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("path is a directory, expected a file: {0}")]
    PathIsDirectory(PathBuf),
}
