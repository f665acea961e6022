//! Repository configuration record
//!
//! A JSON file at `.ait/config` carrying the repository format version and
//! the default author identity. The version marker is what allows the
//! on-disk encodings to be migrated deliberately; the identity is the
//! fallback when no `AIT_AUTHOR_*` environment is set.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current repository format version
pub const REPOSITORY_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UserConfig {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoreConfig {
    pub repository_format_version: u32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        CoreConfig {
            repository_format_version: REPOSITORY_FORMAT_VERSION,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    pub core: CoreConfig,
    pub user: UserConfig,
}

impl Config {
    pub fn with_user(name: Option<String>, email: Option<String>) -> Self {
        Config {
            core: CoreConfig::default(),
            user: UserConfig {
                name: name.unwrap_or_default(),
                email: email.unwrap_or_default(),
            },
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        let config: Config = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to decode config at {}", path.display()))?;

        if config.core.repository_format_version != REPOSITORY_FORMAT_VERSION {
            anyhow::bail!(
                "unsupported repository format version: {}",
                config.core.repository_format_version
            );
        }

        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let raw = serde_json::to_vec_pretty(self)?;
        std::fs::write(path, raw)
            .with_context(|| format!("failed to write config at {}", path.display()))
    }
}
