//! AES-256-CFB secret encoding.
//!
//! Each call to `encrypt` draws a fresh random 16-byte IV from the OS
//! and prepends it to the ciphertext.  The result is stored as
//! unpadded standard base64 text:
//!
//! ```text
//! base64_nopad( [ 16-byte IV | CFB ciphertext ] )
//! ```
//!
//! CFB is a plain stream mode: there is no authentication tag, so a
//! tampered value decrypts to garbage rather than failing.

use aes::Aes256;
use base64::engine::general_purpose::STANDARD_NO_PAD as BASE64;
use base64::Engine;
use cfb_mode::cipher::{AsyncStreamCipher, KeyIvInit};
use rand::rngs::OsRng;
use rand::TryRngCore;

use crate::errors::{KeyringError, Result};

/// AES block size, which is also the IV length.
pub const IV_LEN: usize = 16;

type Aes256CfbEnc = cfb_mode::Encryptor<Aes256>;
type Aes256CfbDec = cfb_mode::Decryptor<Aes256>;

/// Encrypt `plaintext` with `key` and return the encoded secret.
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<String> {
    let mut buf = vec![0u8; IV_LEN + plaintext.len()];
    let (iv, body) = buf.split_at_mut(IV_LEN);

    OsRng
        .try_fill_bytes(iv)
        .map_err(|e| KeyringError::Cipher(format!("random IV: {e}")))?;

    let cipher = Aes256CfbEnc::new_from_slices(key, iv)
        .map_err(|e| KeyringError::Cipher(format!("invalid key length: {e}")))?;

    body.copy_from_slice(plaintext);
    cipher.encrypt(body);

    Ok(BASE64.encode(&buf))
}

/// Decode and decrypt a value produced by `encrypt`.
///
/// Returns the raw plaintext bytes.  A wrong key is not detected here.
pub fn decrypt(key: &[u8], encoded: &str) -> Result<Vec<u8>> {
    let mut data = BASE64
        .decode(encoded)
        .map_err(|e| KeyringError::Decode(e.to_string()))?;

    if data.len() < IV_LEN {
        return Err(KeyringError::TruncatedCiphertext { len: data.len() });
    }

    let (iv, body) = data.split_at_mut(IV_LEN);
    let cipher = Aes256CfbDec::new_from_slices(key, iv)
        .map_err(|e| KeyringError::Cipher(format!("invalid key length: {e}")))?;
    cipher.decrypt(body);

    Ok(data.split_off(IV_LEN))
}
