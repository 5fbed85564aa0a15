//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;

use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{KeyringError, Result};
use crate::keyring::Keyring;
use crate::store::home_root;

/// Environment variable consulted before prompting for the passphrase.
pub const PASSPHRASE_ENV: &str = "FILE_KEYRING_PASSPHRASE";

/// file-keyring CLI: encrypted credential store backed by a local file.
#[derive(Parser)]
#[command(
    name = "file-keyring",
    about = "Encrypted credential store backed by a local file",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory the store path is resolved against (default: home directory)
    #[arg(long, env = "FILE_KEYRING_ROOT", global = true)]
    pub root: Option<PathBuf>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Print the password stored for a service and user
    Get {
        /// Service name (e.g. github)
        service: String,
        /// User name
        user: String,
    },

    /// Store a password for a service and user (add or update)
    Set {
        /// Service name (e.g. github)
        service: String,
        /// User name
        user: String,
        /// Password (omit for interactive prompt)
        value: Option<String>,
    },

    /// Remove the password for a service and user
    Delete {
        /// Service name (e.g. github)
        service: String,
        /// User name
        user: String,
    },

    /// List stored service:user entries
    List,
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Get the master passphrase, trying in order:
/// 1. `FILE_KEYRING_PASSPHRASE` env var (scripts/CI)
/// 2. Interactive prompt (an empty answer selects the fallback key)
///
/// Returns `Zeroizing<String>` so the passphrase is wiped from memory on drop.
pub fn prompt_passphrase() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSPHRASE_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter keyring password")
        .allow_empty_password(true)
        .interact()
        .map_err(|e| KeyringError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Resolve the root directory: `--root` if given, else the home directory.
pub fn resolve_root(cli: &Cli) -> Result<PathBuf> {
    match &cli.root {
        Some(root) => Ok(root.clone()),
        None => home_root(),
    }
}

/// Ask for the passphrase and open the keyring under the resolved root.
pub fn open_keyring(cli: &Cli) -> Result<Keyring> {
    let root = resolve_root(cli)?;
    let settings = Settings::load(&root)?;
    let passphrase = prompt_passphrase()?;
    Keyring::with_settings(passphrase.as_bytes(), &root, &settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_get() {
        let cli = Cli::try_parse_from(["file-keyring", "get", "github", "alice"]).unwrap();
        match cli.command {
            Commands::Get { service, user } => {
                assert_eq!(service, "github");
                assert_eq!(user, "alice");
            }
            _ => panic!("expected get"),
        }
    }

    #[test]
    fn set_value_is_optional() {
        let cli = Cli::try_parse_from(["file-keyring", "set", "github", "alice"]).unwrap();
        assert!(matches!(cli.command, Commands::Set { value: None, .. }));
    }

    #[test]
    fn root_flag_is_global() {
        let cli =
            Cli::try_parse_from(["file-keyring", "list", "--root", "/tmp/kr"]).unwrap();
        assert_eq!(cli.root, Some(PathBuf::from("/tmp/kr")));
        assert_eq!(resolve_root(&cli).unwrap(), PathBuf::from("/tmp/kr"));
    }

    #[test]
    fn rejects_unknown_command() {
        assert!(Cli::try_parse_from(["file-keyring", "dump"]).is_err());
    }

    #[test]
    fn get_requires_user() {
        assert!(Cli::try_parse_from(["file-keyring", "get", "github"]).is_err());
    }
}
