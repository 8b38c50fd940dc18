//! # Identity Module
//!
//! An [`Identity`] is one party's X25519 keypair plus the two operations
//! that matter: encrypt to a peer, decrypt from a peer.
//!
//! ```text
//!   encrypt(peer_pub, m):              decrypt(peer_pub, iv, ct):
//!     k  = X25519(our_secret, peer_pub)  k  = X25519(our_secret, peer_pub)
//!     iv = 12 random bytes               m  = AES-256-GCM-Open(k, iv, ct)
//!     ct = AES-256-GCM(k, iv, m)
//! ```
//!
//! Both sides compute the same `k`, so Bob decrypts what Alice encrypted by
//! passing *Alice's* public key. An identity is immutable after
//! construction; every call is independent and the type is `Send + Sync`.
//!
//! Keys are accepted and returned as standard Base64. The private key never
//! leaves memory unless the caller asks for it with [`Identity::private_key`].

mod message;

pub use message::EncryptedMessage;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::fmt;
use tracing::{debug, warn};

use crate::address_book::PublicKeyDirectory;
use crate::crypto::{encryption, exchange, selftest};
use crate::crypto::keys::{KeyPair, PeerPublicKey};
use crate::error::{E2eError, E2eResult};

/// One party in an end-to-end encrypted conversation.
#[derive(Clone)]
pub struct Identity {
    keypair: KeyPair,
}

impl Identity {
    /// Create an identity with a freshly generated keypair.
    ///
    /// # Errors
    ///
    /// - [`E2eError::Configuration`] if the crypto self-test fails.
    /// - [`E2eError::RandomnessUnavailable`] if the OS RNG fails.
    pub fn generate() -> E2eResult<Self> {
        selftest::ensure_primitives()?;
        let identity = Self {
            keypair: KeyPair::generate()?,
        };
        debug!(fingerprint = %identity.fingerprint(), "generated new identity");
        Ok(identity)
    }

    /// Restore an identity from a Base64-encoded 32-byte private key.
    ///
    /// # Errors
    ///
    /// - [`E2eError::Configuration`] if the crypto self-test fails.
    /// - [`E2eError::InvalidKey`] if the key is not Base64 or not 32 bytes.
    pub fn from_private_key(private_key_b64: &str) -> E2eResult<Self> {
        selftest::ensure_primitives()?;
        Self::from_keypair(KeyPair::from_base64(private_key_b64)?)
    }

    /// Wrap an existing keypair.
    pub fn from_keypair(keypair: KeyPair) -> E2eResult<Self> {
        selftest::ensure_primitives()?;
        Ok(Self { keypair })
    }

    /// Base64 of our public key. Share this freely.
    pub fn public_key(&self) -> String {
        self.keypair.public_key_base64()
    }

    /// Base64 of our private key. Don't share this at all.
    pub fn private_key(&self) -> String {
        self.keypair.secret_key_base64()
    }

    /// Short fingerprint of our public key.
    pub fn fingerprint(&self) -> String {
        self.keypair.public_key().fingerprint()
    }

    /// The underlying keypair.
    pub fn keypair(&self) -> &KeyPair {
        &self.keypair
    }

    /// Encrypt `message` for the holder of `remote_public_key_b64`.
    ///
    /// A new random nonce is drawn on every call, so encrypting the same
    /// message twice yields two unrelated envelopes.
    ///
    /// # Errors
    ///
    /// - [`E2eError::InvalidKey`] for a malformed, wrong-length or low-order
    ///   public key.
    /// - [`E2eError::RandomnessUnavailable`] if no nonce could be drawn.
    pub fn encrypt(
        &self,
        remote_public_key_b64: &str,
        message: impl AsRef<[u8]>,
    ) -> E2eResult<EncryptedMessage> {
        let peer = PeerPublicKey::from_base64(remote_public_key_b64)?;
        let shared = exchange::agree(&self.keypair, &peer)?;

        let (nonce, ciphertext) = encryption::seal(shared.as_bytes(), message.as_ref())?;

        debug!(peer = %peer.fingerprint(), bytes = ciphertext.len(), "encrypted message");
        Ok(EncryptedMessage {
            iv: BASE64.encode(nonce),
            ciphertext: BASE64.encode(ciphertext),
        })
    }

    /// Decrypt a message from the holder of `remote_public_key_b64` and
    /// return it as text.
    ///
    /// # Errors
    ///
    /// Everything [`decrypt_bytes`](Self::decrypt_bytes) returns, plus
    /// [`E2eError::Decode`] if the authenticated plaintext is not UTF-8.
    pub fn decrypt(
        &self,
        remote_public_key_b64: &str,
        iv_b64: &str,
        ciphertext_b64: &str,
    ) -> E2eResult<String> {
        let plaintext = self.decrypt_bytes(remote_public_key_b64, iv_b64, ciphertext_b64)?;
        String::from_utf8(plaintext).map_err(|_| E2eError::Decode("plaintext"))
    }

    /// Decrypt a message and return the raw plaintext bytes.
    ///
    /// # Errors
    ///
    /// - [`E2eError::InvalidKey`] for a bad public key.
    /// - [`E2eError::Decode`] if `iv_b64` or `ciphertext_b64` isn't Base64.
    /// - [`E2eError::DecryptionFailed`] for anything the AEAD rejects: wrong
    ///   key, tampering, truncation, or a nonce that isn't 12 bytes.
    pub fn decrypt_bytes(
        &self,
        remote_public_key_b64: &str,
        iv_b64: &str,
        ciphertext_b64: &str,
    ) -> E2eResult<Vec<u8>> {
        let peer = PeerPublicKey::from_base64(remote_public_key_b64)?;
        let nonce = BASE64.decode(iv_b64).map_err(|_| E2eError::Decode("iv"))?;
        let ciphertext = BASE64
            .decode(ciphertext_b64)
            .map_err(|_| E2eError::Decode("ciphertext"))?;

        let shared = exchange::agree(&self.keypair, &peer)?;

        encryption::open(shared.as_bytes(), &nonce, &ciphertext).map_err(|e| {
            warn!(peer = %peer.fingerprint(), "message failed authentication");
            E2eError::from(e)
        })
    }

    /// Decrypt an [`EncryptedMessage`] envelope.
    pub fn decrypt_message(
        &self,
        remote_public_key_b64: &str,
        message: &EncryptedMessage,
    ) -> E2eResult<String> {
        self.decrypt(remote_public_key_b64, &message.iv, &message.ciphertext)
    }

    /// Encrypt for a peer whose key is stored under `name` in `directory`.
    pub fn encrypt_to<D>(
        &self,
        directory: &D,
        name: &str,
        message: impl AsRef<[u8]>,
    ) -> E2eResult<EncryptedMessage>
    where
        D: PublicKeyDirectory + ?Sized,
    {
        let remote = resolve(directory, name)?;
        self.encrypt(&remote, message)
    }

    /// Decrypt a message from the peer stored under `name` in `directory`.
    pub fn decrypt_from<D>(
        &self,
        directory: &D,
        name: &str,
        message: &EncryptedMessage,
    ) -> E2eResult<String>
    where
        D: PublicKeyDirectory + ?Sized,
    {
        let remote = resolve(directory, name)?;
        self.decrypt_message(&remote, message)
    }
}

fn resolve<D>(directory: &D, name: &str) -> E2eResult<String>
where
    D: PublicKeyDirectory + ?Sized,
{
    directory
        .lookup(name)?
        .ok_or_else(|| E2eError::UnknownPeer(name.to_string()))
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity(pub={})", self.fingerprint())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn pair() -> (Identity, Identity) {
        (Identity::generate().unwrap(), Identity::generate().unwrap())
    }

    #[test]
    fn test_generated_keys_are_32_bytes() {
        let id = Identity::generate().unwrap();
        assert_eq!(BASE64.decode(id.public_key()).unwrap().len(), 32);
        assert_eq!(BASE64.decode(id.private_key()).unwrap().len(), 32);
    }

    #[test]
    fn test_keys_are_stable_across_calls() {
        let id = Identity::generate().unwrap();
        assert_eq!(id.public_key(), id.public_key());
        assert_eq!(id.private_key(), id.private_key());
    }

    #[test]
    fn test_restore_from_private_key() {
        let original = Identity::generate().unwrap();
        let restored = Identity::from_private_key(&original.private_key()).unwrap();
        assert_eq!(restored.private_key(), original.private_key());
        assert_eq!(restored.public_key(), original.public_key());
    }

    #[test]
    fn test_invalid_private_key_rejected() {
        let short = BASE64.encode(b"invalid private key");
        assert!(matches!(
            Identity::from_private_key(&short),
            Err(E2eError::InvalidKey(_))
        ));
        assert!(matches!(
            Identity::from_private_key("%%% not base64 %%%"),
            Err(E2eError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_hello_bob() {
        let (alice, bob) = pair();
        let sealed = alice.encrypt(&bob.public_key(), "Hello, Bob!").unwrap();
        let opened = bob
            .decrypt(&alice.public_key(), &sealed.iv, &sealed.ciphertext)
            .unwrap();
        assert_eq!(opened, "Hello, Bob!");
    }

    #[test]
    fn test_sender_can_also_decrypt() {
        // Same shared key on both sides, so Alice can read her own message.
        let (alice, bob) = pair();
        let sealed = alice.encrypt(&bob.public_key(), "note to self").unwrap();
        assert_eq!(
            alice.decrypt_message(&bob.public_key(), &sealed).unwrap(),
            "note to self"
        );
    }

    #[test]
    fn test_iv_is_twelve_bytes() {
        let (alice, bob) = pair();
        let sealed = alice.encrypt(&bob.public_key(), "x").unwrap();
        assert_eq!(BASE64.decode(&sealed.iv).unwrap().len(), 12);
        assert_eq!(BASE64.decode(&sealed.ciphertext).unwrap().len(), 1 + 16);
    }

    #[test]
    fn test_binary_payload_roundtrip() {
        let (alice, bob) = pair();
        let payload: Vec<u8> = (0..=255u8).collect();
        let sealed = alice.encrypt(&bob.public_key(), &payload).unwrap();
        let opened = bob
            .decrypt_bytes(&alice.public_key(), &sealed.iv, &sealed.ciphertext)
            .unwrap();
        assert_eq!(opened, payload);
    }

    #[test]
    fn test_non_utf8_plaintext_needs_decrypt_bytes() {
        let (alice, bob) = pair();
        let sealed = alice.encrypt(&bob.public_key(), [0xFFu8, 0xFE]).unwrap();
        assert!(matches!(
            bob.decrypt(&alice.public_key(), &sealed.iv, &sealed.ciphertext),
            Err(E2eError::Decode("plaintext"))
        ));
    }

    #[test]
    fn test_encrypt_rejects_bad_public_keys() {
        let alice = Identity::generate().unwrap();
        for bad in [
            BASE64.encode(b"invalid key"),
            "not base64!".to_string(),
            BASE64.encode([0u8; 32]),
        ] {
            assert!(matches!(
                alice.encrypt(&bad, "test message"),
                Err(E2eError::InvalidKey(_))
            ));
        }
    }

    #[test]
    fn test_decrypt_rejects_bad_public_key() {
        let (alice, bob) = pair();
        let sealed = alice.encrypt(&bob.public_key(), "test message").unwrap();
        let bad = BASE64.encode(b"invalid key");
        assert!(matches!(
            bob.decrypt(&bad, &sealed.iv, &sealed.ciphertext),
            Err(E2eError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_decrypt_rejects_malformed_base64_fields() {
        let (alice, bob) = pair();
        let sealed = alice.encrypt(&bob.public_key(), "test").unwrap();
        assert!(matches!(
            bob.decrypt(&alice.public_key(), "***", &sealed.ciphertext),
            Err(E2eError::Decode("iv"))
        ));
        assert!(matches!(
            bob.decrypt(&alice.public_key(), &sealed.iv, "***"),
            Err(E2eError::Decode("ciphertext"))
        ));
    }

    #[test]
    fn test_substituted_ciphertext_fails() {
        let (alice, bob) = pair();
        let sealed = alice.encrypt(&bob.public_key(), "test message").unwrap();
        let forged = BASE64.encode("invalid ciphertext");
        assert!(matches!(
            bob.decrypt(&alice.public_key(), &sealed.iv, &forged),
            Err(E2eError::DecryptionFailed)
        ));
    }

    #[test]
    fn test_substituted_iv_fails() {
        let (alice, bob) = pair();
        let sealed = alice.encrypt(&bob.public_key(), "test message").unwrap();
        let zero_iv = BASE64.encode([0u8; 12]);
        assert!(matches!(
            bob.decrypt(&alice.public_key(), &zero_iv, &sealed.ciphertext),
            Err(E2eError::DecryptionFailed)
        ));

        let short_iv = BASE64.encode([0u8; 8]);
        assert!(matches!(
            bob.decrypt(&alice.public_key(), &short_iv, &sealed.ciphertext),
            Err(E2eError::DecryptionFailed)
        ));
    }

    #[test]
    fn test_wrong_sender_key_fails() {
        let (alice, bob) = pair();
        let mallory = Identity::generate().unwrap();
        let sealed = alice.encrypt(&bob.public_key(), "for bob").unwrap();
        assert!(matches!(
            bob.decrypt_message(&mallory.public_key(), &sealed),
            Err(E2eError::DecryptionFailed)
        ));
    }

    #[test]
    fn test_named_peer_helpers() {
        let (alice, bob) = pair();
        let mut directory = HashMap::new();
        directory.insert("alice".to_string(), alice.public_key());
        directory.insert("bob".to_string(), bob.public_key());

        let sealed = alice.encrypt_to(&directory, "bob", "via directory").unwrap();
        assert_eq!(
            bob.decrypt_from(&directory, "alice", &sealed).unwrap(),
            "via directory"
        );

        assert!(matches!(
            alice.encrypt_to(&directory, "carol", "nobody home"),
            Err(E2eError::UnknownPeer(ref name)) if name == "carol"
        ));
    }

    #[test]
    fn test_identity_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Identity>();
    }

    #[test]
    fn test_debug_hides_private_key() {
        let id = Identity::generate().unwrap();
        let debug_str = format!("{:?}", id);
        assert!(debug_str.starts_with("Identity(pub="));
        assert!(!debug_str.contains(&id.private_key()));
    }
}
