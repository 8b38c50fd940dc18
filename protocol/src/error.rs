//! Error types for PeerSeal.
//!
//! Every public operation on an [`Identity`](crate::Identity) returns an
//! [`E2eError`]. Setup problems (`Configuration`, `RandomnessUnavailable`)
//! are fatal; the rest are per-call failures the caller can report and
//! move on from. Nothing here is ever retried internally: a decryption that
//! failed once will fail again with the same inputs.

use thiserror::Error;

use crate::address_book::AddressBookError;
use crate::crypto::encryption::EncryptionError;
use crate::crypto::keys::KeyError;

/// Errors produced by identity construction, encryption and decryption.
#[derive(Debug, Error)]
pub enum E2eError {
    /// X25519 or AES-256-GCM failed the startup self-test.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Malformed Base64, wrong-length key material, or a low-order point.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Authentication failed or the ciphertext/nonce was malformed. Which
    /// one is not reported.
    #[error("decryption failed")]
    DecryptionFailed,

    /// The AEAD refused to seal the message (plaintext beyond GCM limits).
    #[error("encryption failed")]
    EncryptionFailed,

    /// The OS random source could not supply bytes.
    #[error("secure random source unavailable")]
    RandomnessUnavailable,

    /// A non-key field was not valid Base64 (or the plaintext was not UTF-8).
    #[error("malformed {0} encoding")]
    Decode(&'static str),

    /// No public key is stored under this name.
    #[error("no public key stored for peer {0:?}")]
    UnknownPeer(String),

    /// The address book could not be read while resolving a peer.
    #[error("address book error: {0}")]
    AddressBook(#[from] AddressBookError),
}

pub type E2eResult<T> = Result<T, E2eError>;

impl From<KeyError> for E2eError {
    fn from(err: KeyError) -> Self {
        match err {
            KeyError::RandomnessUnavailable => E2eError::RandomnessUnavailable,
            other => E2eError::InvalidKey(other.to_string()),
        }
    }
}

impl From<EncryptionError> for E2eError {
    fn from(err: EncryptionError) -> Self {
        match err {
            EncryptionError::EncryptFailed => E2eError::EncryptionFailed,
            EncryptionError::DecryptFailed => E2eError::DecryptionFailed,
            EncryptionError::RandomnessUnavailable => E2eError::RandomnessUnavailable,
        }
    }
}
