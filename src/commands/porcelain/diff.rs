use crate::areas::repository::Repository;
use crate::artifacts::diff::{DiffEntry, DiffTarget, snapshot_diff};
use crate::artifacts::objects::object_id::ObjectId;
use colored::Colorize;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// List paths whose content differs between two snapshots
    ///
    /// Default compares the working tree against the index; `cached`
    /// compares the index against the HEAD tree. Only identities are
    /// reported; no textual patch is produced.
    pub async fn diff(
        &mut self,
        cached: bool,
        path_filter: Option<&Path>,
    ) -> anyhow::Result<Vec<DiffEntry>> {
        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let target = match cached {
            true => DiffTarget::IndexVsHead,
            false => DiffTarget::WorktreeVsIndex,
        };

        let entries = snapshot_diff(self, &index, target, path_filter)?;

        for entry in &entries {
            let verb = if entry.is_addition() {
                "added".green()
            } else if entry.is_deletion() {
                "deleted".red()
            } else {
                "modified".yellow()
            };
            writeln!(self.writer(), "{}: {}", verb, entry.path.display())?;

            let side = |oid: &Option<ObjectId>| match oid {
                Some(oid) => oid.to_short_oid(),
                None => "-".to_string(),
            };
            writeln!(
                self.writer(),
                "  {} -> {}",
                side(&entry.old_oid),
                side(&entry.new_oid)
            )?;
        }

        Ok(entries)
    }
}
