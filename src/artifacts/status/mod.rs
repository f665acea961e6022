//! Working tree status
//!
//! Three-way comparison among the working tree, the staging index, and the
//! HEAD tree. Comparison is always by content identity; timestamps and
//! sizes are never trusted on their own, so touching a file without
//! changing it reports nothing and edits survive cross-filesystem copies.

pub mod file_change;
pub mod inspector;
pub mod report;
