use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::error::CoreError;
use colored::Colorize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Per-path outcome of one `add` invocation
///
/// Staging is per path: one unreadable argument does not roll back the
/// paths that were already staged.
#[derive(Debug, Default)]
pub struct AddReport {
    pub staged: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

impl AddReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

impl Repository {
    /// Stage files for the next commit
    ///
    /// Directory arguments are expanded to the files beneath them. Each
    /// file is hashed and stored immediately, so the staged content is
    /// frozen at add time regardless of later edits.
    pub async fn add(&mut self, paths: &[String]) -> anyhow::Result<AddReport> {
        // rehydrate-stage-write is a read-modify-write of the index file;
        // serialize it with commits and with other adds
        let _lock = self.lock_for_commit()?;

        let index = self.index();
        let mut index = index.lock().await;

        index.rehydrate()?;

        let mut report = AddReport::default();

        for raw_path in paths {
            let requested = PathBuf::from(raw_path);

            let files = match self.expand_path(&requested) {
                Ok(files) => files,
                Err(e) => {
                    report.failed.push((requested, format!("{e:#}")));
                    continue;
                }
            };

            for file in files {
                match self.stage_file(&mut index, &file) {
                    Ok(()) => report.staged.push(file),
                    Err(e) => report.failed.push((file, format!("{e:#}"))),
                }
            }
        }

        index.write_updates()?;

        for path in &report.staged {
            writeln!(self.writer(), "{} {}", "added:".green(), path.display())?;
        }
        for (path, reason) in &report.failed {
            writeln!(
                self.writer(),
                "{} {}: {}",
                "failed:".red(),
                path.display(),
                reason
            )?;
        }

        Ok(report)
    }

    fn expand_path(&self, path: &Path) -> anyhow::Result<Vec<PathBuf>> {
        let full_path = self.workspace().path().join(path);

        if !full_path.exists() {
            return Err(CoreError::PathNotFound(path.to_path_buf()).into());
        }

        self.workspace().list_files(Some(full_path))
    }

    fn stage_file(&self, index: &mut Index, path: &Path) -> anyhow::Result<()> {
        let blob = self.workspace().parse_blob(path)?;
        let oid = self.database().store(&blob)?;
        let size = blob.len() as u64;

        index.stage(IndexEntry::new(
            path.to_path_buf(),
            oid,
            size,
            chrono::Utc::now(),
        ));

        Ok(())
    }
}
