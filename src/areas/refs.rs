//! Refs and HEAD
//!
//! A ref is a branch name mapped to a commit id, stored as a one-line text
//! file under `.ait/refs/heads/`. `HEAD` is a symbolic ref selecting the
//! active branch (`ref: refs/heads/<name>`). A branch file that exists but
//! is empty is an *unborn* ref: the branch is real but no commit has been
//! made on it yet.
//!
//! Ref updates take an exclusive file lock; reads go through the symbolic
//! chain until they hit a direct id or run out of files.

use crate::artifacts::objects::object_id::ObjectId;
use crate::error::CoreError;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Pattern for symbolic reference content
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Default branch created by `init`
pub const DEFAULT_BRANCH: &str = "main";

/// Ref store rooted at the repository marker directory (`.ait`)
#[derive(Debug, new)]
pub struct Refs {
    path: Box<Path>,
}

/// A ref file's content: either a pointer to another ref or a direct id
#[derive(Debug, Clone)]
enum SymRefOrOid {
    SymRef { target: String },
    Oid(ObjectId),
}

impl SymRefOrOid {
    fn read(path: &Path) -> anyhow::Result<Option<SymRefOrOid>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)?;
        let content = content.trim();

        // an unborn ref is an existing but empty file
        if content.is_empty() {
            return Ok(None);
        }

        let symref_match = regex::Regex::new(SYMREF_REGEX)?.captures(content);
        if let Some(symref_match) = symref_match {
            Ok(Some(SymRefOrOid::SymRef {
                target: symref_match[1].to_string(),
            }))
        } else {
            Ok(Some(SymRefOrOid::Oid(ObjectId::try_parse(
                content.to_string(),
            )?)))
        }
    }
}

impl Refs {
    /// Name of the branch HEAD currently selects
    pub fn current_ref(&self) -> anyhow::Result<String> {
        let head = SymRefOrOid::read(&self.head_path())?;

        match head {
            Some(SymRefOrOid::SymRef { target }) => Ok(target
                .strip_prefix("refs/heads/")
                .unwrap_or(&target)
                .to_string()),
            _ => Err(anyhow::anyhow!("HEAD does not name an active ref")),
        }
    }

    /// Commit id the active ref points at, `None` while unborn
    pub fn read_head(&self) -> anyhow::Result<Option<ObjectId>> {
        self.read_symref(&self.head_path())
    }

    /// Commit id a branch points at, `None` while unborn
    ///
    /// # Errors
    ///
    /// `RefNotFound` when no such branch file exists.
    pub fn read_ref(&self, name: &str) -> anyhow::Result<Option<ObjectId>> {
        let ref_path = self.heads_path().join(name);
        if !ref_path.exists() {
            return Err(CoreError::RefNotFound(name.to_string()).into());
        }

        self.read_symref(&ref_path)
    }

    /// Create a new branch pointing at a commit
    ///
    /// # Errors
    ///
    /// `RefExists` when a branch with that name is already present.
    pub fn create_ref(&self, name: &str, oid: &ObjectId) -> anyhow::Result<()> {
        let ref_path = self.heads_path().join(name);

        if ref_path.exists() && !Self::is_unborn_file(&ref_path)? {
            return Err(CoreError::RefExists(name.to_string()).into());
        }

        log::debug!("creating ref {name} -> {oid}");
        self.write_ref_file(ref_path.into_boxed_path(), oid.as_ref().to_string())
    }

    /// Advance an existing branch to a new commit
    ///
    /// Linear single-parent history only; any advance is accepted, no
    /// fast-forward check is made.
    ///
    /// # Errors
    ///
    /// `RefNotFound` when the branch does not exist.
    pub fn update_ref(&self, name: &str, oid: &ObjectId) -> anyhow::Result<()> {
        let ref_path = self.heads_path().join(name);
        if !ref_path.exists() {
            return Err(CoreError::RefNotFound(name.to_string()).into());
        }

        log::debug!("updating ref {name} -> {oid}");
        self.write_ref_file(ref_path.into_boxed_path(), oid.as_ref().to_string())
    }

    /// Point HEAD at an existing branch
    ///
    /// # Errors
    ///
    /// `RefNotFound` when the branch does not exist.
    pub fn set_head(&self, name: &str) -> anyhow::Result<()> {
        let ref_path = self.heads_path().join(name);
        if !ref_path.exists() {
            return Err(CoreError::RefNotFound(name.to_string()).into());
        }

        self.write_ref_file(self.head_path(), format!("ref: refs/heads/{name}"))
    }

    /// Create HEAD and the unborn default branch during init
    pub fn initialize(&self, default_branch: &str) -> anyhow::Result<()> {
        std::fs::create_dir_all(self.heads_path())
            .context("Failed to create refs/heads directory")?;

        self.write_ref_file(
            self.head_path(),
            format!("ref: refs/heads/{default_branch}"),
        )?;

        let branch_path = self.heads_path().join(default_branch);
        if !branch_path.exists() {
            std::fs::write(&branch_path, b"").context("Failed to create default branch file")?;
        }

        Ok(())
    }

    /// All branches with their commit ids (`None` = unborn), sorted by name
    pub fn list_refs(&self) -> anyhow::Result<Vec<(String, Option<ObjectId>)>> {
        let heads = self.heads_path();
        let mut refs = WalkDir::new(&heads)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                let name = entry
                    .path()
                    .strip_prefix(&heads)
                    .ok()?
                    .to_string_lossy()
                    .to_string();
                Some(name)
            })
            .map(|name| {
                let oid = self.read_ref(&name)?;
                Ok((name, oid))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        refs.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(refs)
    }

    fn read_symref(&self, path: &Path) -> anyhow::Result<Option<ObjectId>> {
        match SymRefOrOid::read(path)? {
            Some(SymRefOrOid::SymRef { target }) => self.read_symref(&self.path.join(target)),
            Some(SymRefOrOid::Oid(oid)) => Ok(Some(oid)),
            None => Ok(None),
        }
    }

    fn is_unborn_file(path: &Path) -> anyhow::Result<bool> {
        Ok(SymRefOrOid::read(path)?.is_none())
    }

    fn write_ref_file(&self, path: Box<Path>, raw_ref: String) -> anyhow::Result<()> {
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!("failed to create parent directories for ref file at {path:?}")
        })?)?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path.clone())
            .with_context(|| format!("failed to open ref file at {path:?}"))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(raw_ref.as_bytes())?;

        Ok(())
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join("HEAD").into_boxed_path()
    }

    pub fn refs_path(&self) -> PathBuf {
        self.path.join("refs")
    }

    pub fn heads_path(&self) -> PathBuf {
        self.refs_path().join("heads")
    }
}
