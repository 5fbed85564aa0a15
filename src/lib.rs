pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod keyring;
pub mod store;

pub use errors::{KeyringError, Result};
pub use keyring::{Keyring, SecretStore};
