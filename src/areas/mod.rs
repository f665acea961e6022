//! Durable repository areas
//!
//! - `database`: content-addressed object store under `.ait/objects`
//! - `index`: staging area persisted at `.ait/index`
//! - `refs`: branch pointers and HEAD
//! - `workspace`: working tree enumeration and reads
//! - `config`: the repository configuration record
//! - `repository`: the explicit handle tying the areas together

pub mod config;
pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
