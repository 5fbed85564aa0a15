//! The keyring handle: Set/Get/Delete over an encrypted store file.
//!
//! A `Keyring` owns the symmetric key derived from the master
//! passphrase and a handle to the store file.  Every operation runs a
//! full read-modify-write cycle under one mutex, so concurrent callers
//! sharing a `Keyring` never lose each other's updates.  Nothing
//! protects against a second process writing the same file.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use zeroize::Zeroize;

use crate::config::Settings;
use crate::crypto::{cipher, kdf, SymmetricKey};
use crate::errors::{KeyringError, Result};
use crate::store::{entry_key, StoreFile};

/// Operations every credential store provides.
pub trait SecretStore {
    /// Store (or overwrite) the password for `service` and `user`.
    fn set(&self, service: &str, user: &str, password: &str) -> Result<()>;

    /// Return the password for `service` and `user`.
    fn get(&self, service: &str, user: &str) -> Result<String>;

    /// Remove the password for `service` and `user`.  Absence is not an error.
    fn delete(&self, service: &str, user: &str) -> Result<()>;

    /// List stored entry keys (`service:user`), sorted.  Nothing is decrypted.
    fn list(&self) -> Result<Vec<String>>;
}

/// File-backed keyring.  Create one with `Keyring::create` and share it
/// by reference (or in an `Arc`) between callers.
#[derive(Debug)]
pub struct Keyring {
    key: SymmetricKey,
    store: Mutex<StoreFile>,
}

impl Keyring {
    /// Derive the key from `passphrase` and open (or create) the store
    /// under `root` using default settings.
    pub fn create(passphrase: &[u8], root: &Path) -> Result<Self> {
        Self::with_settings(passphrase, root, &Settings::default())
    }

    /// Like `create`, with explicit settings for the store location and
    /// write mode.
    pub fn with_settings(passphrase: &[u8], root: &Path, settings: &Settings) -> Result<Self> {
        let key = kdf::derive_key(passphrase)?;
        let store = StoreFile::open(&settings.store_path(root), settings.write_mode)?;
        Ok(Self::from_parts(key, store))
    }

    /// Build a keyring from an already derived key and opened store.
    pub fn from_parts(key: SymmetricKey, store: StoreFile) -> Self {
        Self {
            key,
            store: Mutex::new(store),
        }
    }

    /// Return a new handle on the same store file with a key derived
    /// from a different passphrase.  `self` is left unchanged.
    pub fn recreate(&self, passphrase: &[u8]) -> Result<Self> {
        let key = kdf::derive_key(passphrase)?;
        let store = self.lock().clone();
        Ok(Self::from_parts(key, store))
    }

    /// Returns the path to the store file.
    pub fn path(&self) -> std::path::PathBuf {
        self.lock().path().to_path_buf()
    }

    /// The lock guards the file, not in-memory state, so a panic in
    /// another holder leaves nothing to repair.
    fn lock(&self) -> MutexGuard<'_, StoreFile> {
        self.store
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SecretStore for Keyring {
    fn set(&self, service: &str, user: &str, password: &str) -> Result<()> {
        let store = self.lock();
        let name = entry_key(service, user);

        store.update(|entries| {
            let encoded = cipher::encrypt(self.key.as_bytes(), password.as_bytes())?;
            entries.insert(name.clone(), encoded);
            Ok(())
        })?;

        tracing::debug!(entry = %name, "secret set");
        Ok(())
    }

    fn get(&self, service: &str, user: &str) -> Result<String> {
        let store = self.lock();
        let entries = store.read()?;
        let name = entry_key(service, user);

        let encoded = entries.get(&name).ok_or_else(|| KeyringError::NotFound {
            service: service.to_string(),
            user: user.to_string(),
        })?;

        let plaintext = cipher::decrypt(self.key.as_bytes(), encoded)?;

        tracing::debug!(entry = %name, "secret read");

        // On error, zeroize the bytes inside the error before discarding.
        String::from_utf8(plaintext).map_err(|e| {
            let mut bad_bytes = e.into_bytes();
            bad_bytes.zeroize();
            KeyringError::InvalidUtf8
        })
    }

    fn delete(&self, service: &str, user: &str) -> Result<()> {
        let store = self.lock();
        let name = entry_key(service, user);

        let existed = store.update(|entries| Ok(entries.remove(&name).is_some()))?;

        tracing::debug!(entry = %name, existed, "secret deleted");
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>> {
        let store = self.lock();
        let entries = store.read()?;
        Ok(entries.into_keys().collect())
    }
}
