//! JSON-file address book.
//!
//! The file is a single JSON object mapping names to Base64 public keys:
//!
//! ```json
//! {
//!   "alice": "QivW4i48KqcZDNHgKPkVPLDgDqynueJdM47LHtSCPmM=",
//!   "bob": "OzaWJHe6AT8v846t3pf+9ecty0FIsQnqNqw9Gik4AQ8="
//! }
//! ```
//!
//! Every read loads the whole file and every mutation rewrites it. There is
//! no locking: two writers racing each other can lose an update. Callers
//! that need concurrent access serialize it themselves.
//!
//! Reads are lenient. A file that is missing, isn't valid JSON, or isn't a
//! JSON object reads as an empty book (non-string values are skipped).
//! Real I/O failures such as a permission error are returned.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use super::PublicKeyDirectory;
use crate::config::AddressBookConfig;

/// Errors from the address book's file I/O.
#[derive(Debug, Error)]
pub enum AddressBookError {
    #[error("address book I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("address book serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

type Entries = BTreeMap<String, String>;

/// An address book persisted as one JSON object in one file.
#[derive(Debug, Clone)]
pub struct JsonFileAddressBook {
    path: PathBuf,
}

impl JsonFileAddressBook {
    /// Open the address book at `config.path`, creating the file (with `{}`)
    /// and its parent directory if they don't exist yet.
    ///
    /// A path that exists but is not a regular file (a directory, say) is
    /// rejected here rather than on the first read.
    pub fn open(config: AddressBookConfig) -> Result<Self, AddressBookError> {
        let book = Self { path: config.path };

        match fs::metadata(&book.path) {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => {
                return Err(book.io_error(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "address book path is not a regular file",
                )));
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if let Some(parent) = book.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent).map_err(|e| book.io_error(e))?;
                }
                fs::write(&book.path, "{}").map_err(|e| book.io_error(e))?;
                debug!(path = %book.path.display(), "created empty address book");
            }
            Err(e) => return Err(book.io_error(e)),
        }

        Ok(book)
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The public key saved under `name`.
    pub fn get(&self, name: &str) -> Result<Option<String>, AddressBookError> {
        Ok(self.load()?.remove(name))
    }

    /// Save (or overwrite) the public key for `name`.
    pub fn save(&self, name: &str, public_key: &str) -> Result<(), AddressBookError> {
        let mut entries = self.load()?;
        let replaced = entries
            .insert(name.to_string(), public_key.to_string())
            .is_some();
        self.store(&entries)?;
        debug!(name, replaced, "saved public key");
        Ok(())
    }

    /// Remove `name`. Removing an absent name is not an error.
    pub fn delete(&self, name: &str) -> Result<(), AddressBookError> {
        let mut entries = self.load()?;
        let removed = entries.remove(name).is_some();
        self.store(&entries)?;
        debug!(name, removed, "deleted public key");
        Ok(())
    }

    /// Whether a key is saved under `name`.
    pub fn has(&self, name: &str) -> Result<bool, AddressBookError> {
        Ok(self.load()?.contains_key(name))
    }

    /// All saved names, sorted.
    pub fn list(&self) -> Result<Vec<String>, AddressBookError> {
        Ok(self.load()?.into_keys().collect())
    }

    fn load(&self) -> Result<Entries, AddressBookError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        let object = match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(object)) => object,
            Ok(_) | Err(_) => {
                warn!(path = %self.path.display(), "address book is not a JSON object, treating as empty");
                return Ok(Entries::new());
            }
        };

        let mut entries = Entries::new();
        for (name, value) in object {
            match value {
                Value::String(key) => {
                    entries.insert(name, key);
                }
                _ => warn!(name, "skipping non-string address book entry"),
            }
        }
        Ok(entries)
    }

    fn store(&self, entries: &Entries) -> Result<(), AddressBookError> {
        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, json).map_err(|e| self.io_error(e))
    }

    fn io_error(&self, source: io::Error) -> AddressBookError {
        AddressBookError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl PublicKeyDirectory for JsonFileAddressBook {
    fn lookup(&self, name: &str) -> Result<Option<String>, AddressBookError> {
        self.get(name)
    }
}
