use crate::areas::repository::Repository;
use crate::artifacts::log::History;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// Print the commit chain from HEAD down to the root commit
    ///
    /// Order is parent linkage, not timestamps. An unborn HEAD prints
    /// nothing and succeeds.
    pub async fn log(&mut self, oneline: bool) -> anyhow::Result<()> {
        let head = self.resolve_head()?;

        for item in History::new(self.database(), head) {
            let (oid, commit) = item?;

            if oneline {
                writeln!(
                    self.writer(),
                    "{} {}",
                    oid.to_short_oid().yellow(),
                    commit.short_message()
                )?;
            } else {
                writeln!(self.writer(), "{}", format!("commit {oid}").yellow())?;
                writeln!(self.writer(), "Author: {}", commit.author().display_name())?;
                writeln!(self.writer(), "Date:   {}", commit.author().readable_timestamp())?;
                writeln!(self.writer())?;
                for line in commit.message().lines() {
                    writeln!(self.writer(), "    {line}")?;
                }
                writeln!(self.writer())?;
            }
        }

        Ok(())
    }
}
