//! Content-addressed object types
//!
//! Every piece of versioned state is one of three object kinds, named by
//! the SHA-256 digest of its canonical encoding:
//!
//! - **Blob**: raw artifact bytes (datasets, model binaries, source files)
//! - **Tree**: a snapshot mapping staged paths to blob identities
//! - **Commit**: a tree identity, an optional parent, and metadata
//!
//! All objects share the on-disk envelope `<kind> <size>\0<content>`.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a SHA-256 digest in hexadecimal form
pub const OBJECT_ID_LENGTH: usize = 64;

/// Length of an abbreviated object id in porcelain output
pub const SHORT_OID_LENGTH: usize = 8;
