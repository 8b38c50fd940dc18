//! # AES-256-GCM Encryption
//!
//! Authenticated encryption for message payloads. The key is always the
//! 32-byte X25519 shared secret; the nonce is 12 fresh random bytes per
//! call; the additional authenticated data is always empty.
//!
//! ## Nonce management
//!
//! GCM is notoriously unforgiving about nonce reuse. Encrypt two messages
//! under the same key and nonce and an attacker gets the XOR of the
//! plaintexts plus the ability to forge tags. Because a pair of static
//! X25519 keys always yields the same AES key, every message between the
//! same two peers is encrypted under one key. The nonce is the only
//! thing keeping them apart. It comes from `OsRng`, every time.
//!
//! ## Wire format
//!
//! Unlike a `nonce || ciphertext` blob, [`seal`] returns the nonce and the
//! ciphertext separately, because the envelope carries them as two fields.
//! The ciphertext has the 16-byte GCM tag appended.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

use crate::config::{AES_KEY_LENGTH, AES_NONCE_LENGTH};

/// Errors that can occur during encryption/decryption.
///
/// Intentionally vague. "Wrong key", "flipped bit" and "truncated input"
/// all look the same from the outside.
#[derive(Debug, Error)]
pub enum EncryptionError {
    #[error("encryption failed")]
    EncryptFailed,

    #[error("decryption failed -- wrong key or corrupted ciphertext")]
    DecryptFailed,

    #[error("secure random source unavailable")]
    RandomnessUnavailable,
}

/// Encrypt `plaintext` under `key` with a fresh random nonce.
///
/// Returns `(nonce, ciphertext)`; the ciphertext includes the GCM tag.
///
/// # Example
///
/// ```
/// use peerseal_protocol::crypto::encryption::{open, seal};
///
/// let key = [0x42u8; 32];
/// let (nonce, ciphertext) = seal(&key, b"meet at noon").unwrap();
/// assert_eq!(open(&key, &nonce, &ciphertext).unwrap(), b"meet at noon");
/// ```
pub fn seal(
    key: &[u8; AES_KEY_LENGTH],
    plaintext: &[u8],
) -> Result<([u8; AES_NONCE_LENGTH], Vec<u8>), EncryptionError> {
    let mut nonce = [0u8; AES_NONCE_LENGTH];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|_| EncryptionError::RandomnessUnavailable)?;

    let ciphertext = seal_with_nonce(key, &nonce, plaintext)?;
    Ok((nonce, ciphertext))
}

/// Encrypt with a caller-chosen nonce.
///
/// Only for known-answer tests. Reusing a nonce under the same key destroys
/// GCM's guarantees, so production code goes through [`seal`].
pub(crate) fn seal_with_nonce(
    key: &[u8; AES_KEY_LENGTH],
    nonce: &[u8; AES_NONCE_LENGTH],
    plaintext: &[u8],
) -> Result<Vec<u8>, EncryptionError> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| EncryptionError::EncryptFailed)?;

    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|_| EncryptionError::EncryptFailed)
}

/// Decrypt and authenticate `ciphertext` (with its trailing tag).
///
/// The nonce is taken as a slice because it arrives off the wire; a nonce
/// of the wrong length fails exactly like a bad tag.
///
/// # Errors
///
/// Returns [`EncryptionError::DecryptFailed`] if the key is wrong, the
/// ciphertext was modified or truncated, or the nonce is not 12 bytes.
pub fn open(
    key: &[u8; AES_KEY_LENGTH],
    nonce: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>, EncryptionError> {
    if nonce.len() != AES_NONCE_LENGTH {
        return Err(EncryptionError::DecryptFailed);
    }

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| EncryptionError::DecryptFailed)?;

    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| EncryptionError::DecryptFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AES_TAG_LENGTH;

    fn test_key() -> [u8; 32] {
        let mut key = [0u8; 32];
        for (i, byte) in key.iter_mut().enumerate() {
            *byte = i as u8;
        }
        key
    }

    #[test]
    fn test_seal_open_roundtrip() {
        let key = test_key();
        let plaintext = b"the quick brown fox jumps over the lazy dog";

        let (nonce, ciphertext) = seal(&key, plaintext).unwrap();
        assert_eq!(open(&key, &nonce, &ciphertext).unwrap(), plaintext);
    }

    #[test]
    fn test_empty_plaintext_is_just_a_tag() {
        let key = test_key();
        let (nonce, ciphertext) = seal(&key, b"").unwrap();
        assert_eq!(ciphertext.len(), AES_TAG_LENGTH);
        assert!(open(&key, &nonce, &ciphertext).unwrap().is_empty());
    }

    #[test]
    fn test_ciphertext_length() {
        let key = test_key();
        let plaintext = b"exactly 26 bytes of input!";
        let (_, ciphertext) = seal(&key, plaintext).unwrap();
        assert_eq!(ciphertext.len(), plaintext.len() + AES_TAG_LENGTH);
    }

    #[test]
    fn test_unique_nonces() {
        let key = test_key();
        let (nonce1, ct1) = seal(&key, b"message").unwrap();
        let (nonce2, ct2) = seal(&key, b"message").unwrap();
        assert_ne!(nonce1, nonce2);
        assert_ne!(ct1, ct2);
    }

    #[test]
    fn test_wrong_key_fails() {
        let key = test_key();
        let (nonce, ciphertext) = seal(&key, b"secret").unwrap();

        let mut wrong_key = test_key();
        wrong_key[0] ^= 0xFF;
        assert!(matches!(
            open(&wrong_key, &nonce, &ciphertext),
            Err(EncryptionError::DecryptFailed)
        ));
    }

    #[test]
    fn test_every_flipped_byte_is_detected() {
        let key = test_key();
        let (nonce, ciphertext) = seal(&key, b"tamper with me").unwrap();

        for i in 0..ciphertext.len() {
            let mut tampered = ciphertext.clone();
            tampered[i] ^= 0x01;
            assert!(open(&key, &nonce, &tampered).is_err(), "byte {i} not detected");
        }
    }

    #[test]
    fn test_wrong_nonce_length_fails() {
        let key = test_key();
        let (nonce, ciphertext) = seal(&key, b"secret").unwrap();
        assert!(open(&key, &nonce[..8], &ciphertext).is_err());

        let mut long_nonce = nonce.to_vec();
        long_nonce.push(0);
        assert!(open(&key, &long_nonce, &ciphertext).is_err());
    }

    #[test]
    fn test_truncated_ciphertext_fails() {
        let key = test_key();
        let (nonce, ciphertext) = seal(&key, b"secret").unwrap();
        assert!(open(&key, &nonce, &ciphertext[..ciphertext.len() - 1]).is_err());
        assert!(open(&key, &nonce, &[]).is_err());
    }

    #[test]
    fn test_large_plaintext() {
        let key = test_key();
        let plaintext = vec![0xAB; 1_000_000];
        let (nonce, ciphertext) = seal(&key, &plaintext).unwrap();
        assert_eq!(open(&key, &nonce, &ciphertext).unwrap(), plaintext);
    }

    #[test]
    fn test_fixed_nonce_is_deterministic() {
        let key = test_key();
        let nonce = [7u8; AES_NONCE_LENGTH];
        let a = seal_with_nonce(&key, &nonce, b"same").unwrap();
        let b = seal_with_nonce(&key, &nonce, b"same").unwrap();
        assert_eq!(a, b);
        assert_eq!(open(&key, &nonce, &a).unwrap(), b"same");
    }
}
