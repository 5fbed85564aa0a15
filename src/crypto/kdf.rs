//! Passphrase key derivation.
//!
//! The store key is a single SHA-256 pass over the passphrase bytes.
//! There is no salt and no stretching: every existing store file was
//! written with exactly this derivation, so changing it would need a
//! format version bump.
//!
//! An empty passphrase selects a fixed fallback key.  Builds with the
//! `hardened` feature reject the empty passphrase instead.

use std::fmt;

use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::Result;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Key used when the passphrase is empty.
#[cfg(not(feature = "hardened"))]
const DEFAULT_KEY: &[u8; KEY_LEN] = b"297ynt237b4tv92ng0m>cy8r4unvch3m";

/// The symmetric key that encrypts every entry of one store.
///
/// Zeroed when dropped; `Debug` never prints the bytes.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey {
    bytes: [u8; KEY_LEN],
}

impl SymmetricKey {
    /// Wrap raw key bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (e.g. to build a cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SymmetricKey(<redacted>)")
    }
}

/// Derive the store key from a passphrase.
///
/// Deterministic: the same passphrase always yields the same key.
pub fn derive_key(passphrase: &[u8]) -> Result<SymmetricKey> {
    if passphrase.is_empty() {
        return fallback_key();
    }

    let mut digest: [u8; KEY_LEN] = Sha256::digest(passphrase).into();
    let key = SymmetricKey::new(digest);
    digest.zeroize();
    Ok(key)
}

#[cfg(not(feature = "hardened"))]
fn fallback_key() -> Result<SymmetricKey> {
    tracing::debug!("empty passphrase, using the fallback key");
    Ok(SymmetricKey::new(*DEFAULT_KEY))
}

#[cfg(feature = "hardened")]
fn fallback_key() -> Result<SymmetricKey> {
    Err(crate::errors::KeyringError::KeyDerivation(
        "empty passphrase is not allowed in hardened builds".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_is_deterministic() {
        let a = derive_key(b"hunter2").unwrap();
        let b = derive_key(b"hunter2").unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn different_passphrases_give_different_keys() {
        let a = derive_key(b"hunter2").unwrap();
        let b = derive_key(b"hunter3").unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn derive_matches_plain_sha256() {
        let key = derive_key(b"abc").unwrap();
        // SHA-256("abc")
        assert_eq!(key.as_bytes()[..4], [0xba, 0x78, 0x16, 0xbf]);
        assert_eq!(key.as_bytes()[28..], [0xf2, 0x00, 0x15, 0xad]);
    }

    #[cfg(not(feature = "hardened"))]
    #[test]
    fn empty_passphrase_uses_fallback_key() {
        let a = derive_key(b"").unwrap();
        let b = derive_key(b"").unwrap();
        assert_eq!(a.as_bytes(), DEFAULT_KEY);
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[cfg(feature = "hardened")]
    #[test]
    fn empty_passphrase_is_rejected_when_hardened() {
        assert!(derive_key(b"").is_err());
    }

    #[test]
    fn debug_output_is_redacted() {
        let key = derive_key(b"hunter2").unwrap();
        assert_eq!(format!("{key:?}"), "SymmetricKey(<redacted>)");
    }
}
