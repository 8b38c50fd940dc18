//! # CLI Interface
//!
//! Defines the command-line argument structure for `peerseal` using `clap`
//! derive. Subcommands: `keygen`, `pubkey`, `encrypt`, `decrypt`, `book`,
//! and `version`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// PeerSeal end-to-end encryption tool.
///
/// Generates X25519 identities, encrypts messages for a peer with
/// AES-256-GCM, and keeps a small address book of peers' public keys.
#[derive(Parser, Debug)]
#[command(
    name = "peerseal",
    about = "X25519 + AES-256-GCM end-to-end encryption",
    version,
    propagate_version = true
)]
pub struct PeersealCli {
    /// Path of the JSON address book.
    ///
    /// Defaults to `peerseal_local_keys.json` in the system temp directory.
    #[arg(long, short = 'b', global = true, env = "PEERSEAL_ADDRESS_BOOK")]
    pub address_book: Option<PathBuf>,

    /// Log output format: `pretty` or `json`. Logs go to stderr.
    #[arg(long, global = true, env = "PEERSEAL_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a new identity and print its keys.
    Keygen(KeygenArgs),
    /// Print the public key belonging to a private key.
    Pubkey(PrivateKeyArgs),
    /// Encrypt a message for a peer and print the payload JSON.
    Encrypt(EncryptArgs),
    /// Decrypt a payload from a peer and print the plaintext.
    Decrypt(DecryptArgs),
    /// Manage the address book.
    Book {
        #[command(subcommand)]
        action: BookCommand,
    },
    /// Print version information and exit.
    Version,
}

/// The caller's own private key.
#[derive(Args, Debug)]
pub struct PrivateKeyArgs {
    /// Base64-encoded 32-byte X25519 private key.
    ///
    /// Prefer the environment variable over the flag so the key stays out
    /// of shell history.
    #[arg(long, env = "PEERSEAL_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,
}

/// Arguments for the `keygen` subcommand.
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Also save the new public key in the address book under this name.
    #[arg(long)]
    pub save_as: Option<String>,
}

/// Arguments for the `encrypt` subcommand.
#[derive(Args, Debug)]
pub struct EncryptArgs {
    #[command(flatten)]
    pub key: PrivateKeyArgs,

    /// Name of the recipient in the address book.
    #[arg(long, conflicts_with = "peer_key", required_unless_present = "peer_key")]
    pub to: Option<String>,

    /// Base64 public key of the recipient.
    #[arg(long)]
    pub peer_key: Option<String>,

    /// The message to encrypt.
    pub message: String,
}

/// Arguments for the `decrypt` subcommand.
#[derive(Args, Debug)]
pub struct DecryptArgs {
    #[command(flatten)]
    pub key: PrivateKeyArgs,

    /// Name of the sender in the address book.
    #[arg(long, conflicts_with = "peer_key", required_unless_present = "peer_key")]
    pub from: Option<String>,

    /// Base64 public key of the sender.
    #[arg(long)]
    pub peer_key: Option<String>,

    /// Payload JSON as printed by `encrypt`.
    #[arg(
        long,
        conflicts_with_all = ["iv", "ciphertext"],
        required_unless_present_all = ["iv", "ciphertext"]
    )]
    pub payload: Option<String>,

    /// Base64 nonce.
    #[arg(long, requires = "ciphertext")]
    pub iv: Option<String>,

    /// Base64 ciphertext with tag.
    #[arg(long, requires = "iv")]
    pub ciphertext: Option<String>,
}

/// Address book subcommands.
#[derive(Subcommand, Debug)]
pub enum BookCommand {
    /// Save (or overwrite) a public key under a name.
    Save { name: String, public_key: String },
    /// Print the public key saved under a name.
    Get { name: String },
    /// Remove a name.
    Delete { name: String },
    /// Print `true` or `false` depending on whether a name is saved.
    Has { name: String },
    /// List all saved names.
    List,
}
