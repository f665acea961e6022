//! Pairwise classification rules
//!
//! Pure functions mapping (index entry, worktree hash, HEAD entry) triples
//! onto the change dimensions. Kept free of I/O so the rules are testable
//! without a repository on disk.

use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::TreeEntry;
use crate::artifacts::status::file_change::{StagedChange, WorktreeChange};

/// Staging index vs HEAD tree for one path
pub fn check_index_against_head(
    index_entry: Option<&IndexEntry>,
    head_entry: Option<&TreeEntry>,
) -> StagedChange {
    match (index_entry, head_entry) {
        (Some(index_entry), Some(head_entry)) if head_entry.oid != index_entry.oid => {
            StagedChange::Modified
        }
        (Some(_), None) => StagedChange::Added,
        _ => StagedChange::None,
    }
}

/// Working tree vs staging entry, falling back to the HEAD entry when the
/// path is not staged
///
/// `worktree_oid` is the content hash of the file as it is on disk right
/// now, `None` when the file is gone.
pub fn check_worktree(
    index_entry: Option<&IndexEntry>,
    head_entry: Option<&TreeEntry>,
    worktree_oid: Option<&ObjectId>,
) -> WorktreeChange {
    let reference_oid = index_entry
        .map(|e| &e.oid)
        .or(head_entry.map(|e| &e.oid));

    match (reference_oid, worktree_oid) {
        (Some(_), None) => WorktreeChange::Deleted,
        (Some(reference), Some(actual)) if reference != actual => WorktreeChange::Modified,
        _ => WorktreeChange::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object::hash_blob_bytes;
    use crate::artifacts::objects::object_type::ObjectType;
    use rstest::rstest;
    use std::path::PathBuf;

    fn index_entry(content: &[u8]) -> IndexEntry {
        IndexEntry::new(
            PathBuf::from("f"),
            hash_blob_bytes(content).unwrap(),
            content.len() as u64,
            chrono::Utc::now(),
        )
    }

    fn head_entry(content: &[u8]) -> TreeEntry {
        TreeEntry::new(ObjectType::Blob, hash_blob_bytes(content).unwrap())
    }

    #[rstest]
    #[case(Some(b"same".as_slice()), Some(b"same".as_slice()), StagedChange::None)]
    #[case(Some(b"new".as_slice()), Some(b"old".as_slice()), StagedChange::Modified)]
    #[case(Some(b"new".as_slice()), None, StagedChange::Added)]
    #[case(None, Some(b"old".as_slice()), StagedChange::None)]
    fn staged_classification(
        #[case] staged: Option<&[u8]>,
        #[case] head: Option<&[u8]>,
        #[case] expected: StagedChange,
    ) {
        let index_entry = staged.map(index_entry);
        let head_entry = head.map(head_entry);
        assert_eq!(
            check_index_against_head(index_entry.as_ref(), head_entry.as_ref()),
            expected
        );
    }

    #[test]
    fn staged_content_is_the_reference_for_worktree_changes() {
        let entry = index_entry(b"staged");
        let on_disk = hash_blob_bytes(b"edited later").unwrap();

        assert_eq!(
            check_worktree(Some(&entry), None, Some(&on_disk)),
            WorktreeChange::Modified
        );
        let staged_oid = entry.oid.clone();
        assert_eq!(
            check_worktree(Some(&entry), None, Some(&staged_oid)),
            WorktreeChange::None
        );
    }

    #[test]
    fn unstaged_paths_compare_against_head() {
        let head = head_entry(b"committed");
        let same = hash_blob_bytes(b"committed").unwrap();
        let edited = hash_blob_bytes(b"edited").unwrap();

        assert_eq!(
            check_worktree(None, Some(&head), Some(&same)),
            WorktreeChange::None
        );
        assert_eq!(
            check_worktree(None, Some(&head), Some(&edited)),
            WorktreeChange::Modified
        );
    }

    #[test]
    fn missing_files_are_deleted_whether_staged_or_committed() {
        let entry = index_entry(b"staged");
        let head = head_entry(b"committed");

        assert_eq!(
            check_worktree(Some(&entry), None, None),
            WorktreeChange::Deleted
        );
        assert_eq!(
            check_worktree(None, Some(&head), None),
            WorktreeChange::Deleted
        );
    }
}
