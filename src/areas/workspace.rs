//! Working tree access
//!
//! Enumerates and reads files under the repository root, excluding the
//! `.ait` marker directory. All reads are byte-level; artifact files are
//! routinely binary.

use crate::artifacts::objects::blob::Blob;
use crate::error::CoreError;
use anyhow::Context;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 3] = [".ait", ".", ".."];

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a working-tree file into a blob
    pub fn parse_blob(&self, path: &Path) -> anyhow::Result<Blob> {
        let data = self.read_file(path)?;
        Ok(Blob::new(data))
    }

    /// All files under `root_file_path` (or the whole tree), as paths
    /// relative to the repository root
    pub fn list_files(&self, root_file_path: Option<PathBuf>) -> anyhow::Result<Vec<PathBuf>> {
        let root_file_path = match root_file_path {
            Some(p) => std::fs::canonicalize(&p)
                .map_err(|_| CoreError::PathNotFound(p.clone()))?,
            None => self.path.clone().into(),
        };

        if root_file_path.is_dir() {
            Ok(WalkDir::new(&root_file_path)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter_map(|entry| self.relative_if_tracked_file(entry.path()))
                .collect::<Vec<_>>())
        } else {
            let relative = root_file_path
                .strip_prefix(self.path.as_ref())
                .map_err(|_| {
                    anyhow::anyhow!(
                        "path {} is outside the repository root",
                        root_file_path.display()
                    )
                })?
                .to_path_buf();

            // repository internals are never tracked, even when named directly
            if Self::is_ignored(&relative) {
                Ok(vec![])
            } else {
                Ok(vec![relative])
            }
        }
    }

    /// Read a file's bytes
    ///
    /// # Errors
    ///
    /// `PathNotFound` when the file is absent, `PathIsDirectory` when the
    /// path resolves to a directory; there is no flattening policy at
    /// this layer.
    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Bytes> {
        let full_path = self.path.join(file_path);

        if !full_path.exists() {
            return Err(CoreError::PathNotFound(file_path.to_path_buf()).into());
        }
        if full_path.is_dir() {
            return Err(CoreError::PathIsDirectory(file_path.to_path_buf()).into());
        }

        let content = std::fs::read(&full_path)
            .with_context(|| format!("failed to read file {}", full_path.display()))?;

        Ok(Bytes::from(content))
    }

    pub fn file_size(&self, file_path: &Path) -> anyhow::Result<u64> {
        let metadata = std::fs::metadata(self.path.join(file_path))?;
        Ok(metadata.len())
    }

    pub fn file_exists(&self, file_path: &Path) -> bool {
        self.path.join(file_path).is_file()
    }

    fn is_ignored(path: &Path) -> bool {
        path.components().any(|component| {
            if let std::path::Component::Normal(name) = component {
                let name_str = name.to_string_lossy();
                IGNORED_PATHS.contains(&name_str.as_ref())
            } else {
                false
            }
        })
    }

    fn relative_if_tracked_file(&self, path: &Path) -> Option<PathBuf> {
        if path.is_file() && !Self::is_ignored(path) {
            Some(path.strip_prefix(self.path.as_ref()).ok()?.to_path_buf())
        } else {
            None
        }
    }
}
