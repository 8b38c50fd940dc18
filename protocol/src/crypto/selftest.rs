//! # Primitive Self-Test
//!
//! Before the first identity is built we check that X25519 and AES-256-GCM
//! produce the published answers. If they don't (a miscompiled backend, a
//! broken target feature, a tampered build), every identity constructor
//! fails with [`E2eError::Configuration`] instead of quietly producing
//! ciphertext nobody can read.
//!
//! Vectors:
//!
//! - X25519: RFC 7748 §6.1 (base-point multiplication and shared secret).
//! - AES-256-GCM: zero key, zero nonce, empty plaintext (McGrew-Viega GCM test
//!   case 13), whose entire output is the tag.
//!
//! The test runs once per process; the verdict is cached.

use std::sync::OnceLock;

use x25519_dalek::{PublicKey, StaticSecret};

use crate::config::{AES_KEY_LENGTH, AES_NONCE_LENGTH, KEY_LENGTH};
use crate::crypto::encryption;
use crate::error::{E2eError, E2eResult};

const X25519_ALICE_SECRET: &str =
    "77076d0a7318a57d3c16c17251b26645df4c2f87ebc0992ab177fba51db92c2a";
const X25519_ALICE_PUBLIC: &str =
    "8520f0098930a754748b7ddcb43ef75a0dbf3a0d26381af4eba4a98eaa9b4e6a";
const X25519_BOB_PUBLIC: &str =
    "de9edb7d7b7dc1b4d35b61c2ece435373f8343c85b78674dadfc7e146f882b4f";
const X25519_SHARED: &str = "4a5d9d5ba4ce2de1728e3bf480350f25e07e21c947d19e3376f09b3c1e161742";

const GCM_EMPTY_TAG: &str = "530f8afbc74536b9a963b4f1c4cb738b";

static VERDICT: OnceLock<Result<(), String>> = OnceLock::new();

/// Verify the crypto backend, running the known-answer tests on first call.
pub fn ensure_primitives() -> E2eResult<()> {
    VERDICT
        .get_or_init(|| {
            let verdict = run_known_answer_tests();
            match &verdict {
                Ok(()) => tracing::debug!("crypto self-test passed"),
                Err(reason) => tracing::error!(%reason, "crypto self-test failed"),
            }
            verdict
        })
        .clone()
        .map_err(E2eError::Configuration)
}

fn run_known_answer_tests() -> Result<(), String> {
    check_x25519()?;
    check_aes_gcm()
}

fn decode32(hex_str: &str) -> Result<[u8; KEY_LENGTH], String> {
    let mut out = [0u8; KEY_LENGTH];
    hex::decode_to_slice(hex_str, &mut out).map_err(|e| format!("bad test vector: {e}"))?;
    Ok(out)
}

fn check_x25519() -> Result<(), String> {
    let secret = StaticSecret::from(decode32(X25519_ALICE_SECRET)?);

    if PublicKey::from(&secret).to_bytes() != decode32(X25519_ALICE_PUBLIC)? {
        return Err("X25519 base-point multiplication is unavailable or incorrect".into());
    }

    let peer = PublicKey::from(decode32(X25519_BOB_PUBLIC)?);
    if secret.diffie_hellman(&peer).to_bytes() != decode32(X25519_SHARED)? {
        return Err("X25519 scalar multiplication is unavailable or incorrect".into());
    }

    Ok(())
}

fn check_aes_gcm() -> Result<(), String> {
    let key = [0u8; AES_KEY_LENGTH];
    let nonce = [0u8; AES_NONCE_LENGTH];
    let unavailable = || "AES-256-GCM is unavailable or incorrect".to_string();

    let sealed = encryption::seal_with_nonce(&key, &nonce, b"").map_err(|_| unavailable())?;
    if hex::encode(&sealed) != GCM_EMPTY_TAG {
        return Err(unavailable());
    }

    let opened = encryption::open(&key, &nonce, &sealed).map_err(|_| unavailable())?;
    if !opened.is_empty() {
        return Err(unavailable());
    }

    Ok(())
}
