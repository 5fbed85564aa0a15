//! `file-keyring list` — show stored entries without decrypting them.

use crate::cli::output;
use crate::cli::{open_keyring, Cli};
use crate::errors::Result;
use crate::keyring::SecretStore;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let keyring = open_keyring(cli)?;
    output::print_entries(&keyring.list()?);
    Ok(())
}
