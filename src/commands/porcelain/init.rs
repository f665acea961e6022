use crate::areas::config::Config;
use crate::areas::refs::DEFAULT_BRANCH;
use crate::areas::repository::Repository;
use crate::error::CoreError;
use anyhow::Context;
use std::fs;
use std::io::Write;

impl Repository {
    /// Create the repository skeleton under `.ait`
    ///
    /// Fails with `AlreadyInitialized` when a config record is already
    /// present; an existing repository is never reset.
    pub async fn init(
        &mut self,
        user_name: Option<String>,
        user_email: Option<String>,
    ) -> anyhow::Result<()> {
        if self.is_initialized() {
            return Err(CoreError::AlreadyInitialized(self.path().to_path_buf()).into());
        }

        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .ait/objects directory")?;

        self.refs()
            .initialize(DEFAULT_BRANCH)
            .context("Failed to create HEAD and the default branch")?;

        let index = self.index();
        let mut index = index.lock().await;
        // materialize an empty but well-formed index file
        index.rehydrate()?;
        index.write_updates()?;

        Config::with_user(user_name, user_email).save(&self.config_path())?;

        writeln!(
            self.writer(),
            "Initialized empty ait repository in {}",
            self.ait_path().display()
        )?;

        Ok(())
    }
}
