//! ait: content-addressed versioning for AI artifacts
//!
//! The crate is split the same way the on-disk repository is:
//!
//! - `areas`: durable storage areas (`.ait/objects`, the staging index,
//!   refs, the configuration record) plus the working tree and the
//!   `Repository` handle that ties them together
//! - `artifacts`: the data model (blob/tree/commit objects, staging
//!   entries) and the algorithms over it (status, log, diff)
//! - `commands`: porcelain and plumbing operations exposed to the CLI
//! - `error`: the structured failure taxonomy

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod error;
