//! Walk-through of a PeerSeal conversation between Alice and Bob.
//!
//! Creates two identities, registers their public keys in a throwaway
//! address book, exchanges a message in each direction, and shows what
//! happens when Eve tries to read along. Output uses ANSI colors.
//!
//! Run with:
//!   cargo run --example alice_bob

use std::time::Instant;

use peerseal_protocol::{AddressBookConfig, E2eError, Identity, JsonFileAddressBook};

// ---------------------------------------------------------------------------
// ANSI color constants
// ---------------------------------------------------------------------------

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const MAGENTA: &str = "\x1b[35m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

fn section(num: u32, title: &str) {
    println!();
    println!("{BOLD}{CYAN}===[{YELLOW} Step {num} {CYAN}]================================================{RESET}");
    println!("{BOLD}{WHITE}  {title}{RESET}");
}

fn success(text: &str) {
    println!("{GREEN}  [OK] {text}{RESET}");
}

fn info(label: &str, value: &str) {
    println!("{WHITE}  {BOLD}{label}:{RESET} {YELLOW}{value}{RESET}");
}

fn timing(label: &str, elapsed: std::time::Duration) {
    let ms = elapsed.as_secs_f64() * 1000.0;
    println!("{DIM}{MAGENTA}  [{label}: {ms:.3} ms]{RESET}");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!();
    println!("{BOLD}{WHITE}  PEERSEAL  --  X25519 + AES-256-GCM walk-through{RESET}");

    // -----------------------------------------------------------------
    section(1, "Create identities");
    // -----------------------------------------------------------------
    let start = Instant::now();
    let alice = Identity::generate()?;
    let bob = Identity::generate()?;
    timing("two keypairs", start.elapsed());

    info("Alice public key", &alice.public_key());
    info("Alice fingerprint", &alice.fingerprint());
    info("Bob public key", &bob.public_key());
    info("Bob fingerprint", &bob.fingerprint());

    // -----------------------------------------------------------------
    section(2, "Exchange public keys via the address book");
    // -----------------------------------------------------------------
    let dir = std::env::temp_dir().join(format!("peerseal-demo-{}", std::process::id()));
    let book = JsonFileAddressBook::open(AddressBookConfig::with_path(dir.join("keys.json")))?;
    book.save("alice", &alice.public_key())?;
    book.save("bob", &bob.public_key())?;
    info("Book file", &book.path().display().to_string());
    info("Contacts", &book.list()?.join(", "));

    // -----------------------------------------------------------------
    section(3, "Alice writes to Bob");
    // -----------------------------------------------------------------
    let start = Instant::now();
    let sealed = alice.encrypt_to(&book, "bob", "Hello, Bob!")?;
    timing("encrypt", start.elapsed());
    println!("{DIM}  {}{RESET}", serde_json::to_string_pretty(&sealed)?);

    let start = Instant::now();
    let opened = bob.decrypt_from(&book, "alice", &sealed)?;
    timing("decrypt", start.elapsed());
    success(&format!("Bob reads: {opened:?}"));

    // -----------------------------------------------------------------
    section(4, "Bob replies");
    // -----------------------------------------------------------------
    let reply = bob.encrypt_to(&book, "alice", "你好，Alice! 🌍")?;
    success(&format!("Alice reads: {:?}", alice.decrypt_from(&book, "bob", &reply)?));

    // -----------------------------------------------------------------
    section(5, "Eve intercepts the envelope");
    // -----------------------------------------------------------------
    let eve = Identity::generate()?;
    match eve.decrypt_message(&alice.public_key(), &sealed) {
        Err(E2eError::DecryptionFailed) => success("Eve gets nothing: decryption failed"),
        Ok(text) => println!("{RED}  [!!] Eve read {text:?}{RESET}"),
        Err(other) => println!("{RED}  [!!] unexpected error: {other}{RESET}"),
    }

    std::fs::remove_dir_all(&dir)?;
    println!();
    Ok(())
}
