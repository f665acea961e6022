//! Staging index data structures
//!
//! The index file is a version-marked JSON envelope so its encoding can be
//! migrated explicitly rather than guessed at.

pub mod index_entry;

/// Format marker written into the index envelope
pub const INDEX_VERSION: u32 = 1;
