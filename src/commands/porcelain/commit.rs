use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::error::CoreError;
use std::io::Write;

impl Repository {
    /// Turn the staged snapshot into a commit and advance the active ref
    ///
    /// The whole critical section runs under the commit lock. Objects are
    /// written before the ref moves and the index is cleared last, so a
    /// failure at any point leaves HEAD and the index untouched; at worst
    /// the object store holds unreferenced objects.
    pub async fn commit(&mut self, message: &str) -> anyhow::Result<ObjectId> {
        let index = self.index();
        let mut index = index.lock().await;

        let _lock = self.lock_for_commit()?;

        index.rehydrate()?;
        if index.is_empty() {
            return Err(CoreError::NothingToCommit.into());
        }

        let tree = Tree::build(index.entries());
        let tree_oid = self.database().store(&tree)?;

        let parent = self.resolve_head()?;
        if let Some(parent_oid) = &parent
            && !self.database().exists(parent_oid)
        {
            return Err(CoreError::ObjectNotFound(parent_oid.clone()).into());
        }
        let is_root = match parent {
            Some(_) => "",
            None => "(root-commit) ",
        };

        let author = self.author()?;
        let message = message.trim().to_string();

        let commit = Commit::new(parent, tree_oid, author, message);
        let commit_oid = self.database().store(&commit)?;

        let branch = self.refs().current_ref()?;
        self.refs().update_ref(&branch, &commit_oid)?;

        index.clear();
        index.write_updates()?;

        writeln!(
            self.writer(),
            "[{} {}{}] {}",
            branch,
            is_root,
            commit_oid.to_short_oid(),
            commit.short_message()
        )?;

        Ok(commit_oid)
    }
}
