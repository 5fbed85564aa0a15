use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{KeyringError, Result};
use crate::store::WriteMode;

/// User-level configuration, loaded from
/// `<root>/.config/file-keyring/config.toml`.
///
/// Every field has a sensible default so the keyring works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to the root) that holds the store file.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Name of the store file inside `data_dir`.
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// How updates are written back (`atomic` or `in-place`).
    #[serde(default)]
    pub write_mode: WriteMode,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_data_dir() -> String {
    ".local/share/file-keyring".to_string()
}

fn default_file_name() -> String {
    "keyring.yaml".to_string()
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            file_name: default_file_name(),
            write_mode: WriteMode::default(),
        }
    }
}

impl Settings {
    /// Location of the config file, relative to the root.
    const FILE_PATH: &'static str = ".config/file-keyring/config.toml";

    /// Load settings from `<root>/.config/file-keyring/config.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(root: &Path) -> Result<Self> {
        let config_path = root.join(Self::FILE_PATH);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            KeyringError::Config(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        tracing::debug!(path = %config_path.display(), "loaded settings");
        Ok(settings)
    }

    /// Build the full path to the store file.
    ///
    /// Example: `/home/alice/.local/share/file-keyring/keyring.yaml`
    pub fn store_path(&self, root: &Path) -> PathBuf {
        root.join(&self.data_dir).join(&self.file_name)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
