//! # Key Management
//!
//! X25519 keypairs and peer public keys.
//!
//! A [`KeyPair`] is 32 bytes of secret scalar plus the public point derived
//! from it by base-point multiplication. The scalar is kept exactly as it
//! was generated or supplied; clamping happens inside the scalar
//! multiplication, so `private_key()` hands back the same bytes you put in.
//!
//! Outside this module keys travel as standard, padded Base64 of the raw
//! 32 bytes.
//!
//! ## Security considerations
//!
//! - Secrets come from `OsRng`. If the OS can't give us entropy we return
//!   [`KeyError::RandomnessUnavailable`] rather than limping on.
//! - `StaticSecret` zeroizes itself on drop.
//! - Secret bytes never appear in `Debug` output or logs.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;
use thiserror::Error;
use x25519_dalek::{PublicKey, StaticSecret};

use crate::config::KEY_LENGTH;
use crate::crypto::hash;

/// Errors that can occur while decoding or generating keys.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("key is not valid base64")]
    MalformedEncoding,

    #[error("expected {KEY_LENGTH} key bytes, got {0}")]
    InvalidLength(usize),

    #[error("public key is a low-order point")]
    LowOrderPoint,

    #[error("secure random source unavailable")]
    RandomnessUnavailable,
}

/// Decode a Base64 string into exactly [`KEY_LENGTH`] bytes.
fn decode_key(encoded: &str) -> Result<[u8; KEY_LENGTH], KeyError> {
    let bytes = BASE64
        .decode(encoded.trim())
        .map_err(|_| KeyError::MalformedEncoding)?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| KeyError::InvalidLength(len))
}

// ---------------------------------------------------------------------------
// KeyPair
// ---------------------------------------------------------------------------

/// An X25519 keypair. The public half is always derived, never set.
#[derive(Clone)]
pub struct KeyPair {
    secret: StaticSecret,
    public: PublicKey,
}

impl KeyPair {
    /// Generate a keypair from 32 fresh bytes of OS randomness.
    pub fn generate() -> Result<Self, KeyError> {
        let mut bytes = [0u8; KEY_LENGTH];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|_| KeyError::RandomnessUnavailable)?;
        Ok(Self::from_bytes(bytes))
    }

    /// Build a keypair from a raw 32-byte private scalar.
    ///
    /// Every 32-byte string is a usable X25519 private key, so this can't
    /// fail.
    pub fn from_bytes(secret_bytes: [u8; KEY_LENGTH]) -> Self {
        let secret = StaticSecret::from(secret_bytes);
        let public = PublicKey::from(&secret);
        Self { secret, public }
    }

    /// Build a keypair from a Base64-encoded private key.
    pub fn from_base64(encoded: &str) -> Result<Self, KeyError> {
        decode_key(encoded).map(Self::from_bytes)
    }

    /// The public half, ready to hand to a peer.
    pub fn public_key(&self) -> PeerPublicKey {
        PeerPublicKey {
            bytes: self.public.to_bytes(),
        }
    }

    /// Raw public key bytes.
    pub fn public_key_bytes(&self) -> [u8; KEY_LENGTH] {
        self.public.to_bytes()
    }

    /// Raw private scalar bytes, exactly as generated or supplied.
    ///
    /// **Handle with care.** Whoever holds these bytes can read every
    /// message ever sent to this identity.
    pub fn secret_key_bytes(&self) -> [u8; KEY_LENGTH] {
        self.secret.to_bytes()
    }

    /// Base64 of the public key.
    pub fn public_key_base64(&self) -> String {
        BASE64.encode(self.public.as_bytes())
    }

    /// Base64 of the private scalar.
    pub fn secret_key_base64(&self) -> String {
        BASE64.encode(self.secret.as_bytes())
    }

    pub(crate) fn secret(&self) -> &StaticSecret {
        &self.secret
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyPair(pub={})", self.public_key().fingerprint())
    }
}

impl PartialEq for KeyPair {
    /// Compared by public key.
    fn eq(&self, other: &Self) -> bool {
        self.public_key_bytes() == other.public_key_bytes()
    }
}

impl Eq for KeyPair {}

// ---------------------------------------------------------------------------
// PeerPublicKey
// ---------------------------------------------------------------------------

/// A peer's X25519 public key, length-checked.
///
/// Whether the point is low-order can only be told after the scalar
/// multiplication, so that check lives in
/// [`exchange::agree`](crate::crypto::exchange::agree).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerPublicKey {
    bytes: [u8; KEY_LENGTH],
}

impl PeerPublicKey {
    /// Wrap raw public key bytes.
    pub fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { bytes }
    }

    /// Parse a public key from a byte slice of exactly 32 bytes.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        let bytes: [u8; KEY_LENGTH] = slice
            .try_into()
            .map_err(|_| KeyError::InvalidLength(slice.len()))?;
        Ok(Self { bytes })
    }

    /// Parse a Base64-encoded public key.
    pub fn from_base64(encoded: &str) -> Result<Self, KeyError> {
        decode_key(encoded).map(Self::from_bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.bytes
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(self.bytes)
    }

    /// Short SHA-256 fingerprint for reading aloud over the phone.
    pub fn fingerprint(&self) -> String {
        hash::fingerprint(&self.bytes)
    }

    pub(crate) fn to_dalek(self) -> PublicKey {
        PublicKey::from(self.bytes)
    }
}

impl fmt::Display for PeerPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base64())
    }
}

impl fmt::Debug for PeerPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PeerPublicKey({})", self.fingerprint())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_produces_valid_keypair() {
        let kp = KeyPair::generate().unwrap();
        assert_eq!(kp.public_key_bytes().len(), 32);
        assert_eq!(kp.secret_key_bytes().len(), 32);
    }

    #[test]
    fn test_public_key_is_derived_deterministically() {
        let kp = KeyPair::generate().unwrap();
        let again = KeyPair::from_bytes(kp.secret_key_bytes());
        assert_eq!(kp.public_key_bytes(), again.public_key_bytes());
        assert_eq!(kp.public_key_base64(), kp.public_key_base64());
    }

    #[test]
    fn test_secret_bytes_are_not_clamped() {
        // All-0xFF would be altered by clamping; it must come back untouched.
        let kp = KeyPair::from_bytes([0xFF; 32]);
        assert_eq!(kp.secret_key_bytes(), [0xFF; 32]);
    }

    #[test]
    fn test_base64_roundtrip() {
        let kp = KeyPair::generate().unwrap();
        let restored = KeyPair::from_base64(&kp.secret_key_base64()).unwrap();
        assert_eq!(kp, restored);
        assert_eq!(kp.secret_key_bytes(), restored.secret_key_bytes());
    }

    #[test]
    fn test_base64_is_standard_padded() {
        let kp = KeyPair::from_bytes([0u8; 32]);
        assert_eq!(
            kp.secret_key_base64(),
            "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA="
        );
    }

    #[test]
    fn test_rejects_wrong_length() {
        let short = BASE64.encode(b"invalid private key");
        assert!(matches!(
            KeyPair::from_base64(&short),
            Err(KeyError::InvalidLength(19))
        ));
        assert!(matches!(
            PeerPublicKey::from_base64(&BASE64.encode([1u8; 33])),
            Err(KeyError::InvalidLength(33))
        ));
    }

    #[test]
    fn test_rejects_malformed_base64() {
        assert!(matches!(
            KeyPair::from_base64("not base64 at all!"),
            Err(KeyError::MalformedEncoding)
        ));
        assert!(matches!(
            PeerPublicKey::from_base64("@@@@"),
            Err(KeyError::MalformedEncoding)
        ));
    }

    #[test]
    fn test_two_generated_keypairs_are_different() {
        let kp1 = KeyPair::generate().unwrap();
        let kp2 = KeyPair::generate().unwrap();
        assert_ne!(kp1.public_key_bytes(), kp2.public_key_bytes());
        assert_ne!(kp1.secret_key_bytes(), kp2.secret_key_bytes());
    }

    #[test]
    fn test_peer_public_key_try_from_slice() {
        let kp = KeyPair::generate().unwrap();
        let pk = PeerPublicKey::try_from_slice(&kp.public_key_bytes()).unwrap();
        assert_eq!(pk, kp.public_key());
        assert!(PeerPublicKey::try_from_slice(&[0u8; 16]).is_err());
    }

    #[test]
    fn test_display_is_base64() {
        let kp = KeyPair::generate().unwrap();
        assert_eq!(kp.public_key().to_string(), kp.public_key_base64());
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let kp = KeyPair::from_bytes([0x11; 32]);
        let debug_str = format!("{:?}", kp);
        assert!(debug_str.starts_with("KeyPair(pub="));
        assert!(!debug_str.contains(&kp.secret_key_base64()));
    }
}
