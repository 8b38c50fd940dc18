//! # X25519 Key Agreement
//!
//! Static-static Diffie-Hellman between two long-lived identities.
//!
//! Alice computes `X25519(a, B)`, Bob computes `X25519(b, A)`, and both get
//! the same 32 bytes. Those bytes are used **directly** as the AES-256-GCM
//! key. No KDF, no transcript hashing. That keeps the envelope compatible
//! with existing peers, at the cost of departing from the usual "hash the
//! DH output" practice. Both parties' keys are static, so the same pair of
//! identities always derives the same AES key; see the nonce notes in
//! [`encryption`](crate::crypto::encryption).
//!
//! ## Low-order points
//!
//! Curve25519 has a handful of points of small order. Multiply any scalar
//! by one of them and you get all zeros, meaning the "shared" secret is
//! known to everyone. We reject any peer key that produces a
//! non-contributory result.

use x25519_dalek::SharedSecret;

use crate::crypto::keys::{KeyError, KeyPair, PeerPublicKey};

/// Derive the shared secret between `ours` and a peer's public key.
///
/// The returned [`SharedSecret`] zeroizes itself on drop; keep it no longer
/// than one encrypt or decrypt call.
///
/// # Errors
///
/// [`KeyError::LowOrderPoint`] if the peer key yields an all-zero secret.
pub fn agree(ours: &KeyPair, peer: &PeerPublicKey) -> Result<SharedSecret, KeyError> {
    let shared = ours.secret().diffie_hellman(&peer.to_dalek());
    if !shared.was_contributory() {
        return Err(KeyError::LowOrderPoint);
    }
    Ok(shared)
}
