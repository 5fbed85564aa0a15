//! `file-keyring delete` — remove the password for a service and user.

use crate::cli::output;
use crate::cli::{open_keyring, Cli};
use crate::errors::Result;
use crate::keyring::SecretStore;

/// Execute the `delete` command.
///
/// Deleting an entry that does not exist still succeeds.
pub fn execute(cli: &Cli, service: &str, user: &str) -> Result<()> {
    let keyring = open_keyring(cli)?;
    keyring.delete(service, user)?;

    output::success(&format!("Deleted secret for '{service}:{user}'"));
    Ok(())
}
