//! The encrypted envelope.
//!
//! On the wire a message is two Base64 strings and nothing else:
//!
//! ```json
//! { "iv": "<12-byte nonce>", "ciphertext": "<ciphertext + 16-byte tag>" }
//! ```
//!
//! No sender key, no key id, no version byte. The receiver must already know
//! whose public key to decrypt with.

use serde::{Deserialize, Serialize};

/// Output of [`Identity::encrypt`](crate::Identity::encrypt).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedMessage {
    /// Base64 of the 12-byte AES-GCM nonce.
    pub iv: String,
    /// Base64 of the AES-GCM ciphertext with its tag appended.
    pub ciphertext: String,
}

impl EncryptedMessage {
    pub fn new(iv: impl Into<String>, ciphertext: impl Into<String>) -> Self {
        Self {
            iv: iv.into(),
            ciphertext: ciphertext.into(),
        }
    }
}
