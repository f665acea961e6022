//! Data model and algorithms
//!
//! - `objects`: content-addressed object types (blob, tree, commit)
//! - `index`: staging index entries
//! - `status`: three-way working tree / index / HEAD classification
//! - `log`: commit history traversal
//! - `diff`: snapshot-level change detection

pub mod diff;
pub mod index;
pub mod log;
pub mod objects;
pub mod status;
