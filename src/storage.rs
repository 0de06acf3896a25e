//! Storage
//!
//! Durable key-value storage for marketplace state. Each aggregate lives in
//! its own named [`Slot`], encoded as JSON.

use std::io;

use mockall::automock;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, warn};

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Storage backend errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading a slot from the backend failed.
    #[error("failed to read slot {slot}")]
    Read {
        /// Slot key
        slot: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Writing a slot to the backend failed.
    #[error("failed to write slot {slot}")]
    Write {
        /// Slot key
        slot: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// A value could not be encoded as JSON.
    #[error("failed to encode slot {slot}")]
    Encode {
        /// Slot key
        slot: String,
        /// Underlying encoding error
        #[source]
        source: serde_json::Error,
    },

    /// The backend refused the write because it would exceed its quota.
    #[error("writing slot {slot} would exceed the {quota} byte storage quota")]
    QuotaExceeded {
        /// Slot key
        slot: String,
        /// Backend quota in bytes
        quota: usize,
    },
}

/// Raw string key-value storage.
#[automock]
pub trait KeyValueStore {
    /// Read the raw value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend could not be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend rejected the write.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Named units of persisted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// The product catalog
    Products,

    /// The user directory
    Users,

    /// The logged-in user, or `null`
    CurrentUser,

    /// The shopping cart lines
    Cart,
}

impl Slot {
    /// Storage key for the slot.
    pub fn key(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Users => "users",
            Self::CurrentUser => "currentUser",
            Self::Cart => "cart",
        }
    }
}

/// Typed, JSON-encoded access to a [`KeyValueStore`].
///
/// The store holds no marketplace state of its own; owners call [`save`]
/// after every mutation.
///
/// [`save`]: PersistentStore::save
#[derive(Debug)]
pub struct PersistentStore<S> {
    backend: S,
}

impl<S: KeyValueStore> PersistentStore<S> {
    /// Wrap a backend.
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Load the value stored in `slot`.
    ///
    /// Absent slots and slots whose content does not decode as `T` both
    /// yield `default`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend itself could not be read.
    pub fn load<T: DeserializeOwned>(&self, slot: Slot, default: T) -> Result<T, StorageError> {
        let Some(raw) = self.backend.get(slot.key())? else {
            debug!(slot = slot.key(), "slot absent, using default");

            return Ok(default);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(error) => {
                warn!(slot = slot.key(), %error, "malformed slot, using default");

                Ok(default)
            }
        }
    }

    /// Encode `value` and write it to `slot`, overwriting prior content.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if encoding or the backend write fails.
    pub fn save<T: Serialize + ?Sized>(&mut self, slot: Slot, value: &T) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(value).map_err(|source| StorageError::Encode {
            slot: slot.key().to_string(),
            source,
        })?;

        self.backend.set(slot.key(), &encoded)
    }

    /// Borrow the backend.
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Unwrap the backend.
    pub fn into_backend(self) -> S {
        self.backend
    }
}
