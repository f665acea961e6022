//! Repository handle
//!
//! An explicit handle over one repository's areas. Nothing here walks up
//! parent directories or keeps process-global state: callers construct a
//! `Repository` for a concrete root, which is what lets tests drive
//! several repositories in a single process.

use crate::areas::config::Config;
use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::commit::Author;
use crate::artifacts::objects::object::ObjectBox;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::error::CoreError;
use std::cell::RefCell;
use std::cell::RefMut;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Marker directory holding all repository state
pub const AIT_DIR: &str = ".ait";

/// How long a commit waits for the lock before giving up
const COMMIT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);
const COMMIT_LOCK_POLL: Duration = Duration::from_millis(50);

pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    index: Arc<Mutex<Index>>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    pub fn new(path: &str, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = Path::new(path);
        if !path.exists() {
            std::fs::create_dir_all(path)?;
        }
        let path = path.canonicalize()?;

        let index = Index::new(path.join(AIT_DIR).join("index").into_boxed_path());
        let database = Database::new(path.join(AIT_DIR).join("objects").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(path.join(AIT_DIR).into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            index: Arc::new(Mutex::new(index)),
            database,
            workspace,
            refs,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn ait_path(&self) -> PathBuf {
        self.path.join(AIT_DIR)
    }

    pub fn config_path(&self) -> PathBuf {
        self.ait_path().join("config")
    }

    /// A repository exists once its config record does
    pub fn is_initialized(&self) -> bool {
        self.config_path().exists()
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&self) -> Arc<Mutex<Index>> {
        self.index.clone()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn load_config(&self) -> anyhow::Result<Config> {
        Config::load(&self.config_path())
    }

    /// Author identity: environment first, then the config record
    pub fn author(&self) -> anyhow::Result<Author> {
        if let Some(author) = Author::load_from_env() {
            return Ok(author);
        }

        let config = self.load_config()?;
        if config.user.name.is_empty() || config.user.email.is_empty() {
            anyhow::bail!(
                "author identity not configured; set AIT_AUTHOR_NAME/AIT_AUTHOR_EMAIL \
                 or the user section of {}",
                self.config_path().display()
            );
        }

        Ok(Author::new(config.user.name, config.user.email))
    }

    /// Commit id of the active ref, `None` while unborn
    pub fn resolve_head(&self) -> anyhow::Result<Option<ObjectId>> {
        self.refs.read_head()
    }

    /// Read accessor over the object database
    pub fn get_object(&self, oid: &ObjectId) -> anyhow::Result<ObjectBox> {
        self.database.parse_object(oid)
    }

    pub fn list_refs(&self) -> anyhow::Result<Vec<(String, Option<ObjectId>)>> {
        self.refs.list_refs()
    }

    /// The tree of the HEAD commit, empty while unborn
    pub fn head_tree(&self) -> anyhow::Result<Tree> {
        match self.resolve_head()? {
            Some(head_oid) => {
                let commit = self.database.parse_object_as_commit(&head_oid)?;
                self.database.parse_object_as_tree(commit.tree_oid())
            }
            None => Ok(Tree::default()),
        }
    }

    /// Acquire the exclusive commit lock with a bounded wait
    pub fn lock_for_commit(&self) -> anyhow::Result<CommitLock> {
        CommitLock::acquire(self.ait_path().join("commit.lock"), COMMIT_LOCK_TIMEOUT)
    }
}

/// Exclusive lock file guarding sections that rewrite repository state
///
/// Two concurrent commits must not interleave tree-build, object-put, ref
/// update, and index clear; likewise two adds must not interleave their
/// index read-modify-write. The lock file is created with `create_new`, so
/// only one process can hold it; the holder removes it on drop.
#[derive(Debug)]
pub struct CommitLock {
    path: PathBuf,
}

impl CommitLock {
    fn acquire(path: PathBuf, timeout: Duration) -> anyhow::Result<Self> {
        let deadline = Instant::now() + timeout;

        loop {
            match std::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
            {
                Ok(_) => {
                    log::debug!("acquired commit lock at {}", path.display());
                    return Ok(CommitLock { path });
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    if Instant::now() >= deadline {
                        return Err(CoreError::RepositoryLocked.into());
                    }
                    std::thread::sleep(COMMIT_LOCK_POLL);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl Drop for CommitLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            log::warn!("failed to remove commit lock {}: {e}", self.path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_lock_is_exclusive_and_released_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let lock_path = dir.path().join("commit.lock");

        let held = CommitLock::acquire(lock_path.clone(), Duration::from_secs(1)).unwrap();

        let err =
            CommitLock::acquire(lock_path.clone(), Duration::from_millis(120)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CoreError>(),
            Some(CoreError::RepositoryLocked)
        ));

        drop(held);
        CommitLock::acquire(lock_path, Duration::from_millis(120)).unwrap();
    }
}
