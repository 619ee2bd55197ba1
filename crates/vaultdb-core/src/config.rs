//! Index configuration for vaultdb
//!
//! Looked up in order: an explicit path, `<vault>/.vaultdb.toml`, the global
//! `<config_dir>/vaultdb/config.toml`, then built-in defaults.

pub mod types;

use std::fs;
use std::path::{Path, PathBuf};

use crate::bail_invalid;
use crate::error::{Result, VaultError};
use crate::metadata::HashtagMatcher;
use crate::paths::WalkOptions;

pub use types::{IndexConfig, DEFAULT_CHUNK_SIZE, DEFAULT_TAG_CHARS};

/// Per-vault configuration file name
pub const VAULT_CONFIG_FILE: &str = ".vaultdb.toml";

const CONFIG_DIR: &str = "vaultdb";
const CONFIG_FILE: &str = "config.toml";
const CONFIG_DIR_ENV_VAR: &str = "VAULTDB_CONFIG_DIR";

impl IndexConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| VaultError::io_operation("read config", path.display(), e))?;
        let config: IndexConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| VaultError::Other(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Resolve the configuration for a vault
    pub fn discover(explicit: Option<&Path>, vault_root: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            tracing::debug!(path = %path.display(), "loading explicit config");
            return Self::load(path);
        }

        let local = vault_root.join(VAULT_CONFIG_FILE);
        if local.is_file() {
            tracing::debug!(path = %local.display(), "loading vault config");
            return Self::load(&local);
        }

        if let Some(global) = global_config_path() {
            if global.is_file() {
                tracing::debug!(path = %global.display(), "loading global config");
                return Self::load(&global);
            }
        }

        Ok(Self::default())
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            bail_invalid!("chunk_size", "0 (must be at least 1)");
        }
        HashtagMatcher::new(&self.tag_chars)?;
        Ok(())
    }

    /// Directory walk options derived from this configuration
    pub fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            extensions: self.extensions.clone(),
            skip_hidden: self.skip_hidden,
        }
    }
}

/// Location of the global config file, if a config directory exists
fn global_config_path() -> Option<PathBuf> {
    let dir = match std::env::var(CONFIG_DIR_ENV_VAR) {
        Ok(env_dir) => PathBuf::from(env_dir),
        Err(_) => dirs::config_dir()?.join(CONFIG_DIR),
    };
    Some(dir.join(CONFIG_FILE))
}
