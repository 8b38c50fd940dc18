//! # Protocol Configuration & Constants
//!
//! Every magic number in PeerSeal lives here. The key and nonce sizes are
//! fixed by X25519 and AES-256-GCM, so "configuration" mostly means "where
//! does the address book file go".
//!
//! Changing any of the cryptographic sizes breaks wire compatibility with
//! every peer that already has your public key. Don't.

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Protocol Version
// ---------------------------------------------------------------------------

/// Version of the envelope format (`iv` + `ciphertext`, raw ECDH key).
pub const PROTOCOL_VERSION: &str = "0.1.0";

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// X25519 for Diffie-Hellman key exchange. Montgomery form, not the Edwards
/// form used for signatures. These keys cannot sign anything.
pub const KEY_EXCHANGE_ALGORITHM: &str = "X25519";

/// AES-256-GCM for symmetric encryption.
pub const SYMMETRIC_ALGORITHM: &str = "AES-256-GCM";

/// Length of both X25519 private scalars and public points, in bytes.
pub const KEY_LENGTH: usize = 32;

/// AES-256-GCM key length in bytes. Equal to [`KEY_LENGTH`] because the raw
/// X25519 shared secret is used as the AES key with no KDF in between.
pub const AES_KEY_LENGTH: usize = 32;

/// AES-256-GCM nonce length in bytes. 96 bits, the standard GCM nonce size.
pub const AES_NONCE_LENGTH: usize = 12;

/// AES-256-GCM authentication tag length in bytes.
pub const AES_TAG_LENGTH: usize = 16;

/// Number of SHA-256 bytes shown in a public key fingerprint.
pub const FINGERPRINT_LENGTH: usize = 8;

// ---------------------------------------------------------------------------
// Address Book
// ---------------------------------------------------------------------------

/// File name of the default address book, placed in the system temp dir.
pub const DEFAULT_ADDRESS_BOOK_FILE: &str = "peerseal_local_keys.json";

/// Environment variable that overrides the address book location.
pub const ADDRESS_BOOK_ENV: &str = "PEERSEAL_ADDRESS_BOOK";

/// Where the address book lives.
///
/// Passed into [`JsonFileAddressBook::open`](crate::JsonFileAddressBook::open)
/// so that embedding applications resolve the path however they like (their
/// own config file, a CLI flag, an env var) and hand us the answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressBookConfig {
    /// Path of the JSON file backing the address book.
    pub path: PathBuf,
}

impl AddressBookConfig {
    /// Use an explicit file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolve the path from `PEERSEAL_ADDRESS_BOOK`, falling back to the
    /// default temp-dir location when the variable is unset or empty.
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var_os(ADDRESS_BOOK_ENV))
    }

    fn from_env_value(value: Option<OsString>) -> Self {
        match value {
            Some(path) if !path.is_empty() => Self::with_path(path),
            _ => Self::default(),
        }
    }

    /// The configured file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for AddressBookConfig {
    fn default() -> Self {
        Self::with_path(std::env::temp_dir().join(DEFAULT_ADDRESS_BOOK_FILE))
    }
}
