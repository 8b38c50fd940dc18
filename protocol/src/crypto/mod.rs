//! # Cryptographic Primitives for PeerSeal
//!
//! Everything that touches key material or ciphertext lives here:
//!
//! - **X25519** for key agreement — [`keys`] and [`exchange`].
//! - **AES-256-GCM** for authenticated encryption — [`encryption`].
//! - **SHA-256** for human-readable key fingerprints — [`hash`].
//! - A known-answer **self-test** that gates identity construction —
//!   [`selftest`].
//!
//! ## A note on "rolling your own crypto"
//!
//! We don't. Each function here is a thin, typed wrapper around
//! `x25519-dalek` and `aes-gcm`. The one protocol decision we make, using
//! the raw DH output as the AES key, is documented in [`exchange`].

pub mod encryption;
pub mod exchange;
pub mod hash;
pub mod keys;
pub mod selftest;

pub use encryption::{open, seal};
pub use exchange::agree;
pub use hash::{fingerprint, sha256};
pub use keys::{KeyError, KeyPair, PeerPublicKey};
pub use selftest::ensure_primitives;
