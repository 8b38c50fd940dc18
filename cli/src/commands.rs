//! Subcommand handlers.
//!
//! Each handler writes its result to `out` rather than straight to stdout,
//! which keeps them testable against a buffer.

use anyhow::{bail, Context, Result};
use std::io::Write;

use peerseal_protocol::crypto::PeerPublicKey;
use peerseal_protocol::{
    AddressBookConfig, EncryptedMessage, Identity, JsonFileAddressBook,
};

use crate::cli::{BookCommand, DecryptArgs, EncryptArgs, KeygenArgs, PrivateKeyArgs};

/// Opens the address book the user pointed us at.
pub fn open_book(config: &AddressBookConfig) -> Result<JsonFileAddressBook> {
    JsonFileAddressBook::open(config.clone()).with_context(|| {
        format!(
            "failed to open address book at {}",
            config.path().display()
        )
    })
}

fn load_identity(args: &PrivateKeyArgs) -> Result<Identity> {
    Identity::from_private_key(&args.private_key).context("invalid private key")
}

pub fn keygen(args: KeygenArgs, config: &AddressBookConfig, out: &mut impl Write) -> Result<()> {
    let identity = Identity::generate().context("failed to generate identity")?;

    writeln!(out, "public key  : {}", identity.public_key())?;
    writeln!(out, "private key : {}", identity.private_key())?;
    writeln!(out, "fingerprint : {}", identity.fingerprint())?;

    if let Some(name) = args.save_as {
        let book = open_book(config)?;
        book.save(&name, &identity.public_key())
            .with_context(|| format!("failed to save public key as '{name}'"))?;
        tracing::info!(name = %name, path = %book.path().display(), "saved public key");
        writeln!(out, "saved as    : {name}")?;
    }
    Ok(())
}

pub fn pubkey(args: PrivateKeyArgs, out: &mut impl Write) -> Result<()> {
    let identity = load_identity(&args)?;
    writeln!(out, "{}", identity.public_key())?;
    Ok(())
}

pub fn encrypt(args: EncryptArgs, config: &AddressBookConfig, out: &mut impl Write) -> Result<()> {
    let identity = load_identity(&args.key)?;

    let sealed = match (args.to, args.peer_key) {
        (Some(name), _) => {
            let book = open_book(config)?;
            identity
                .encrypt_to(&book, &name, &args.message)
                .with_context(|| format!("failed to encrypt for '{name}'"))?
        }
        (None, Some(peer_key)) => identity
            .encrypt(&peer_key, &args.message)
            .context("failed to encrypt")?,
        (None, None) => bail!("either --to or --peer-key is required"),
    };

    writeln!(out, "{}", serde_json::to_string_pretty(&sealed)?)?;
    Ok(())
}

pub fn decrypt(args: DecryptArgs, config: &AddressBookConfig, out: &mut impl Write) -> Result<()> {
    let identity = load_identity(&args.key)?;

    let message = match (args.payload, args.iv, args.ciphertext) {
        (Some(payload), _, _) => serde_json::from_str::<EncryptedMessage>(&payload)
            .context("payload is not valid {\"iv\", \"ciphertext\"} JSON")?,
        (None, Some(iv), Some(ciphertext)) => EncryptedMessage::new(iv, ciphertext),
        _ => bail!("either --payload or both --iv and --ciphertext are required"),
    };

    let plaintext = match (args.from, args.peer_key) {
        (Some(name), _) => {
            let book = open_book(config)?;
            identity
                .decrypt_from(&book, &name, &message)
                .with_context(|| format!("failed to decrypt message from '{name}'"))?
        }
        (None, Some(peer_key)) => identity
            .decrypt_message(&peer_key, &message)
            .context("failed to decrypt message")?,
        (None, None) => bail!("either --from or --peer-key is required"),
    };

    writeln!(out, "{plaintext}")?;
    Ok(())
}

pub fn book(action: BookCommand, config: &AddressBookConfig, out: &mut impl Write) -> Result<()> {
    let book = open_book(config)?;

    match action {
        BookCommand::Save { name, public_key } => {
            PeerPublicKey::from_base64(&public_key).context("not a valid public key")?;
            book.save(&name, &public_key)
                .with_context(|| format!("failed to save '{name}'"))?;
            writeln!(out, "saved {name}")?;
        }
        BookCommand::Get { name } => match book.get(&name)? {
            Some(key) => writeln!(out, "{key}")?,
            None => bail!("no public key saved under '{name}'"),
        },
        BookCommand::Delete { name } => {
            book.delete(&name)
                .with_context(|| format!("failed to delete '{name}'"))?;
            writeln!(out, "deleted {name}")?;
        }
        BookCommand::Has { name } => writeln!(out, "{}", book.has(&name)?)?,
        BookCommand::List => {
            for name in book.list()? {
                writeln!(out, "{name}")?;
            }
        }
    }
    Ok(())
}
