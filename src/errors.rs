use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in the file keyring.
#[derive(Debug, Error)]
pub enum KeyringError {
    // --- Init errors ---
    #[error("Cannot resolve the home directory")]
    HomeDirUnavailable,

    #[error("Failed to initialize store at {path}: {source}")]
    Init {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // --- Store errors ---
    #[error("Store file {path} is corrupt: {reason}")]
    CorruptStore { path: PathBuf, reason: String },

    #[error("unknown key for service '{service}' and user '{user}'")]
    NotFound { service: String, user: String },

    // --- Crypto errors ---
    #[error("Stored secret is not valid base64: {0}")]
    Decode(String),

    #[error("Ciphertext block size is too short ({len} bytes)")]
    TruncatedCiphertext { len: usize },

    #[error("Cipher error: {0}")]
    Cipher(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("Decrypted secret is not valid UTF-8 (wrong passphrase?)")]
    InvalidUtf8,

    // --- Config errors ---
    #[error("Config file error: {0}")]
    Config(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    Serialization(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for keyring results.
pub type Result<T> = std::result::Result<T, KeyringError>;
