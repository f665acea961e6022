//! Commit history traversal
//!
//! History is a lazy walk along parent links, starting from HEAD. The
//! ordering is parent linkage, never wall-clock time: a commit always
//! precedes its parent in the sequence even when clocks were skewed at
//! commit time. Commits are immutable, so the walk can be restarted from
//! HEAD at any point and yields the same sequence.

use crate::areas::database::Database;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;

/// Lazy iterator over the parent chain
pub struct History<'d> {
    database: &'d Database,
    next: Option<ObjectId>,
}

impl<'d> History<'d> {
    /// Start a walk at the given commit (typically the resolved HEAD);
    /// `None` produces the empty history of an unborn ref
    pub fn new(database: &'d Database, head: Option<ObjectId>) -> Self {
        History {
            database,
            next: head,
        }
    }
}

impl Iterator for History<'_> {
    type Item = anyhow::Result<(ObjectId, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        let oid = self.next.take()?;

        match self.database.parse_object_as_commit(&oid) {
            Ok(commit) => {
                self.next = commit.parent().cloned();
                Some(Ok((oid, commit)))
            }
            // a broken chain ends the walk after surfacing the failure
            Err(e) => Some(Err(e)),
        }
    }
}
