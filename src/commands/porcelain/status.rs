use crate::areas::repository::Repository;
use crate::artifacts::status::file_change::{StagedChange, WorktreeChange};
use crate::artifacts::status::report::{Status, StatusReport};
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// Report the state of the working tree against index and HEAD
    ///
    /// Classification is by content hash only; timestamps and sizes are
    /// never consulted, so a touched-but-identical file reports clean.
    pub async fn status(&mut self, porcelain: bool) -> anyhow::Result<StatusReport> {
        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let report = Status::new(self).collect(&index)?;

        if porcelain {
            self.render_porcelain(&report)?;
        } else {
            self.render_long(&report)?;
        }

        Ok(report)
    }

    fn render_porcelain(&self, report: &StatusReport) -> anyhow::Result<()> {
        for (path, change) in &report.changes {
            writeln!(
                self.writer(),
                "{} {}",
                change.porcelain_code(),
                path.display()
            )?;
        }
        for path in &report.untracked {
            writeln!(self.writer(), "?? {}", path.display())?;
        }

        Ok(())
    }

    fn render_long(&self, report: &StatusReport) -> anyhow::Result<()> {
        writeln!(self.writer(), "On branch {}", report.branch)?;

        let staged: Vec<_> = report
            .changes
            .iter()
            .filter(|(_, change)| change.staged != StagedChange::None)
            .collect();
        if !staged.is_empty() {
            writeln!(self.writer(), "\nChanges to be committed:")?;
            for (path, change) in staged {
                writeln!(self.writer(), "{}{}", change.staged, path.display())?;
            }
        }

        let unstaged: Vec<_> = report
            .changes
            .iter()
            .filter(|(_, change)| change.worktree != WorktreeChange::None)
            .collect();
        if !unstaged.is_empty() {
            writeln!(self.writer(), "\nChanges not staged for commit:")?;
            for (path, change) in unstaged {
                writeln!(self.writer(), "{}{}", change.worktree, path.display())?;
            }
        }

        if !report.untracked.is_empty() {
            writeln!(self.writer(), "\nUntracked files:")?;
            for path in &report.untracked {
                writeln!(
                    self.writer(),
                    "        {}",
                    path.display().to_string().red()
                )?;
            }
        }

        if report.is_clean() {
            writeln!(self.writer(), "nothing to commit, working tree clean")?;
        }

        Ok(())
    }
}
