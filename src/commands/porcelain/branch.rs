use crate::areas::repository::Repository;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// Create a branch at the current HEAD, or list all branches
    ///
    /// Creation requires a born HEAD; the new branch starts at the same
    /// commit without becoming the active ref.
    pub async fn branch(&mut self, name: Option<String>) -> anyhow::Result<()> {
        match name {
            Some(name) => {
                let head = self.resolve_head()?.ok_or_else(|| {
                    anyhow::anyhow!("cannot create a branch before the first commit")
                })?;

                self.refs().create_ref(&name, &head)?;
                writeln!(
                    self.writer(),
                    "Created branch '{name}' at {}",
                    head.to_short_oid()
                )?;
            }
            None => {
                let current = self.refs().current_ref()?;

                for (name, oid) in self.list_refs()? {
                    let marker = if name == current { "*" } else { " " };
                    let line = match oid {
                        Some(oid) => format!("{marker} {name} {}", oid.to_short_oid()),
                        None => format!("{marker} {name}"),
                    };

                    if name == current {
                        writeln!(self.writer(), "{}", line.green())?;
                    } else {
                        writeln!(self.writer(), "{line}")?;
                    }
                }
            }
        }

        Ok(())
    }
}
