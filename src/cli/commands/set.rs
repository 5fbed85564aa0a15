//! `file-keyring set` — store a password for a service and user.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{open_keyring, Cli};
use crate::errors::{KeyringError, Result};
use crate::keyring::SecretStore;

/// Execute the `set` command.
pub fn execute(cli: &Cli, service: &str, user: &str, value: Option<&str>) -> Result<()> {
    // The master passphrase comes first, before anything touches the store.
    let keyring = open_keyring(cli)?;

    // Determine the password from one of three sources.
    let password = if let Some(v) = value {
        // Source 1: Inline value on the command line.
        output::warning("Value provided on command line — it may appear in shell history.");
        Zeroizing::new(v.to_string())
    } else if !io::stdin().is_terminal() {
        // Source 2: Piped input (stdin is not a terminal).
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        Zeroizing::new(buf.trim_end_matches(['\r', '\n']).to_string())
    } else {
        // Source 3: Interactive secure prompt (default).
        let pw = dialoguer::Password::new()
            .with_prompt("Enter Password")
            .allow_empty_password(true)
            .interact()
            .map_err(|e| KeyringError::CommandFailed(format!("input prompt: {e}")))?;
        Zeroizing::new(pw)
    };

    keyring.set(service, user, &password)?;

    output::success(&format!("Stored secret for '{service}:{user}'"));
    output::tip(&format!("Read it back: file-keyring get {service} {user}"));

    Ok(())
}
