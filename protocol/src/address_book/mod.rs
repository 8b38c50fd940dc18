//! # Address Book
//!
//! Remembers which public key belongs to which name. The identity layer
//! only ever asks one question of it ("what's the key for `name`?") via
//! the [`PublicKeyDirectory`] trait. Everything else (save, delete, list)
//! is for the application sitting on top.
//!
//! Two directories ship with the crate:
//!
//! - [`JsonFileAddressBook`] — one pretty-printed JSON object on disk.
//! - `HashMap<String, String>` / `BTreeMap<String, String>` — in memory,
//!   for tests and for applications that keep contacts elsewhere.

pub mod json_file;

use std::collections::{BTreeMap, HashMap};

pub use json_file::{AddressBookError, JsonFileAddressBook};

/// Name → Base64 public key lookup.
pub trait PublicKeyDirectory {
    /// The Base64 public key stored under `name`, if any.
    fn lookup(&self, name: &str) -> Result<Option<String>, AddressBookError>;
}

impl PublicKeyDirectory for HashMap<String, String> {
    fn lookup(&self, name: &str) -> Result<Option<String>, AddressBookError> {
        Ok(self.get(name).cloned())
    }
}

impl PublicKeyDirectory for BTreeMap<String, String> {
    fn lookup(&self, name: &str) -> Result<Option<String>, AddressBookError> {
        Ok(self.get(name).cloned())
    }
}

impl<D: PublicKeyDirectory + ?Sized> PublicKeyDirectory for &D {
    fn lookup(&self, name: &str) -> Result<Option<String>, AddressBookError> {
        (**self).lookup(name)
    }
}
