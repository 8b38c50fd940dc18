// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # PeerSeal CLI
//!
//! Entry point for the `peerseal` binary. Parses CLI arguments, initializes
//! logging, resolves the address book location, and dispatches to a
//! subcommand handler.
//!
//! - `keygen`  — generate a new identity
//! - `pubkey`  — derive a public key from a private key
//! - `encrypt` — encrypt a message for a peer
//! - `decrypt` — decrypt a message from a peer
//! - `book`    — save, get, delete, check, and list peers' public keys
//! - `version` — print build version information

mod cli;
mod commands;
mod logging;

use anyhow::Result;
use clap::Parser;
use std::io::{self, Write};

use peerseal_protocol::AddressBookConfig;

use cli::{Commands, PeersealCli};
use logging::LogFormat;

fn main() -> Result<()> {
    let cli = PeersealCli::parse();

    logging::init_logging(
        "peerseal=warn,peerseal_protocol=warn",
        LogFormat::from_str_lossy(&cli.log_format),
    );

    // clap already folded PEERSEAL_ADDRESS_BOOK into the flag.
    let config = cli
        .address_book
        .map(AddressBookConfig::with_path)
        .unwrap_or_default();
    tracing::debug!(path = %config.path().display(), "address book location");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Keygen(args) => commands::keygen(args, &config, &mut out)?,
        Commands::Pubkey(args) => commands::pubkey(args, &mut out)?,
        Commands::Encrypt(args) => commands::encrypt(args, &config, &mut out)?,
        Commands::Decrypt(args) => commands::decrypt(args, &config, &mut out)?,
        Commands::Book { action } => commands::book(action, &config, &mut out)?,
        Commands::Version => print_version(&mut out)?,
    }

    out.flush()?;
    Ok(())
}

/// Prints binary and protocol version information.
fn print_version(out: &mut impl Write) -> io::Result<()> {
    use peerseal_protocol::config;

    writeln!(out, "peerseal  {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(out, "protocol  {}", config::PROTOCOL_VERSION)?;
    writeln!(
        out,
        "cipher    {} + {}",
        config::KEY_EXCHANGE_ALGORITHM,
        config::SYMMETRIC_ALGORITHM
    )
}
