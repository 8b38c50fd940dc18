//! # Hashing Utilities
//!
//! SHA-256, used for exactly one thing: turning a 32-byte public key into
//! a fingerprint short enough for two humans to compare over the phone.
//!
//! A fingerprint is display-only. It does not authenticate anybody; it just
//! makes "did you paste the right key?" answerable without reading out 44
//! characters of Base64.

use sha2::{Digest, Sha256};

use crate::config::FINGERPRINT_LENGTH;

/// Compute the SHA-256 digest of `data`.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Fingerprint a public key: the first [`FINGERPRINT_LENGTH`] bytes of its
/// SHA-256, hex-encoded in colon-separated groups of four characters.
///
/// ```
/// use peerseal_protocol::crypto::hash::fingerprint;
///
/// let fp = fingerprint(&[0u8; 32]);
/// assert_eq!(fp.len(), 19);
/// assert_eq!(fp.matches(':').count(), 3);
/// ```
pub fn fingerprint(public_key: &[u8; 32]) -> String {
    let digest = sha256(public_key);
    let hex = hex::encode(&digest[..FINGERPRINT_LENGTH]);
    hex.as_bytes()
        .chunks(4)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join(":")
}
