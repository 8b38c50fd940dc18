// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # PeerSeal Protocol — Core Library
//!
//! Two parties, two X25519 keypairs, one AES-256-GCM channel. That's the
//! whole protocol, and we'd like to keep it that way.
//!
//! An [`Identity`] owns a keypair. Given a peer's public key it derives the
//! Diffie-Hellman shared secret and uses it to seal or open messages with
//! AES-256-GCM under a fresh random nonce per message. Public keys are
//! exchanged out-of-band, or remembered in a small JSON address book.
//!
//! ## Architecture
//!
//! - **crypto** — Key types, X25519 agreement, AES-256-GCM sealing, and the
//!   primitive self-test that runs before the first identity is built.
//! - **identity** — The [`Identity`] type and the [`EncryptedMessage`]
//!   envelope it produces.
//! - **address_book** — Name → public key lookup, backed by one JSON file.
//! - **config** — Protocol constants and address book configuration.
//! - **error** — The [`E2eError`] enum every public operation returns.
//!
//! ## What this is not
//!
//! No signatures, no certificates, no ratchet, no transport. If you need
//! forward secrecy or trust-on-first-use, build it on top. The address book
//! is deliberately dumb: whole-file read, whole-file write, no locking.
//!
//! ## Example
//!
//! ```
//! use peerseal_protocol::Identity;
//!
//! let alice = Identity::generate().unwrap();
//! let bob = Identity::generate().unwrap();
//!
//! let sealed = alice.encrypt(&bob.public_key(), "Hello, Bob!").unwrap();
//! let opened = bob
//!     .decrypt(&alice.public_key(), &sealed.iv, &sealed.ciphertext)
//!     .unwrap();
//! assert_eq!(opened, "Hello, Bob!");
//! ```

pub mod address_book;
pub mod config;
pub mod crypto;
pub mod error;
pub mod identity;

pub use address_book::{AddressBookError, JsonFileAddressBook, PublicKeyDirectory};
pub use config::AddressBookConfig;
pub use error::{E2eError, E2eResult};
pub use identity::{EncryptedMessage, Identity};
