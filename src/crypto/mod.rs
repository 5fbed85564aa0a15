//! Cryptographic primitives for the keyring.
//!
//! This module provides:
//! - SHA-256 passphrase key derivation and the `SymmetricKey` type (`kdf`)
//! - AES-256-CFB encryption to base64 text and back (`cipher`)

pub mod cipher;
pub mod kdf;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_key, ...};
pub use cipher::{decrypt, encrypt, IV_LEN};
pub use kdf::{derive_key, SymmetricKey, KEY_LEN};
