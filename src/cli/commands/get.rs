//! `file-keyring get` — print the password for a service and user.

use crate::cli::{open_keyring, Cli};
use crate::errors::Result;
use crate::keyring::SecretStore;

/// Execute the `get` command.
pub fn execute(cli: &Cli, service: &str, user: &str) -> Result<()> {
    let keyring = open_keyring(cli)?;

    // Decrypt and print the password to stdout.
    let value = zeroize::Zeroizing::new(keyring.get(service, user)?);
    println!("{}", value.as_str());

    Ok(())
}
