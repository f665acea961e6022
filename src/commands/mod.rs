//! Repository operations exposed to the CLI
//!
//! - `porcelain`: user-facing operations (init, add, commit, status, log,
//!   diff, branch)
//! - `plumbing`: low-level object inspection (cat-file)

pub mod plumbing;
pub mod porcelain;
