// src/services/session.rs

//! The current-user record and the key/value storage behind it.
//!
//! Two stores exist: a durable one (files under the data directory, survives a
//! restart) and a tab-scoped one (in memory, gone on restart). Which one holds the
//! user is chosen at login.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::sync::watch;

use crate::models::user::User;

/// Key of the signed-in user record.
pub const USER_KEY: &str = "ecolearn_user";
/// Key of the unverified record staged by signup. Nothing reads it back.
pub const PENDING_USER_KEY: &str = "ecolearn_pending_user";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage i/o failed for '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not encode record for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage lock poisoned")]
    Poisoned,
}

/// Synchronous string key/value storage.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Storage that lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// Storage with one JSON file per key.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::write(self.path(key), value).map_err(|source| StorageError::Io {
            key: key.to_string(),
            source,
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

/// Where a user record is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Persistence {
    /// Survives a restart ("remember me").
    Durable,
    /// Lost when the process exits.
    Tab,
}

/// The one place the current user is read from and written to.
///
/// Writes are visible to the next read immediately; subscribers see every change.
#[derive(Clone)]
pub struct SessionStore {
    durable: Arc<dyn Storage>,
    tab: Arc<dyn Storage>,
    changes: Arc<watch::Sender<Option<User>>>,
}

impl SessionStore {
    pub fn new(durable: Arc<dyn Storage>, tab: Arc<dyn Storage>) -> Self {
        let store = Self {
            durable,
            tab,
            changes: Arc::new(watch::Sender::new(None)),
        };
        let initial = store.current().unwrap_or_else(|e| {
            tracing::warn!("Could not read stored session: {}", e);
            None
        });
        store.changes.send_replace(initial);
        store
    }

    /// Both stores in memory. Nothing survives the process.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()), Arc::new(MemoryStorage::new()))
    }

    fn store(&self, persistence: Persistence) -> &dyn Storage {
        match persistence {
            Persistence::Durable => self.durable.as_ref(),
            Persistence::Tab => self.tab.as_ref(),
        }
    }

    fn read(&self, persistence: Persistence) -> Result<Option<User>, StorageError> {
        let Some(raw) = self.store(persistence).get(USER_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                // An unreadable record counts as signed out.
                tracing::warn!("Discarding unreadable {:?} session record: {}", persistence, e);
                self.store(persistence).remove(USER_KEY)?;
                Ok(None)
            }
        }
    }

    /// The signed-in user. The durable record wins over the tab-scoped one.
    pub fn current(&self) -> Result<Option<User>, StorageError> {
        if let Some(user) = self.read(Persistence::Durable)? {
            return Ok(Some(user));
        }
        self.read(Persistence::Tab)
    }

    /// Which store currently holds the user, if any.
    pub fn persistence(&self) -> Result<Option<Persistence>, StorageError> {
        if self.read(Persistence::Durable)?.is_some() {
            Ok(Some(Persistence::Durable))
        } else if self.read(Persistence::Tab)?.is_some() {
            Ok(Some(Persistence::Tab))
        } else {
            Ok(None)
        }
    }

    /// Signs `user` in, replacing whatever record existed in either store.
    pub fn set(&self, user: &User, persistence: Persistence) -> Result<(), StorageError> {
        let raw = encode(USER_KEY, user)?;
        self.store(persistence).set(USER_KEY, &raw)?;

        let other = match persistence {
            Persistence::Durable => Persistence::Tab,
            Persistence::Tab => Persistence::Durable,
        };
        self.store(other).remove(USER_KEY)?;

        self.changes.send_replace(Some(user.clone()));
        Ok(())
    }

    /// Rewrites the signed-in user's record where it already lives.
    pub fn update(&self, user: &User) -> Result<(), StorageError> {
        let persistence = self.persistence()?.unwrap_or(Persistence::Tab);
        let raw = encode(USER_KEY, user)?;
        self.store(persistence).set(USER_KEY, &raw)?;
        self.changes.send_replace(Some(user.clone()));
        Ok(())
    }

    /// Signs out.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.durable.remove(USER_KEY)?;
        self.tab.remove(USER_KEY)?;
        self.changes.send_replace(None);
        Ok(())
    }

    /// Keeps a freshly signed-up, unverified user until email confirmation.
    pub fn stage_pending(&self, user: &User) -> Result<(), StorageError> {
        let raw = encode(PENDING_USER_KEY, user)?;
        self.tab.set(PENDING_USER_KEY, &raw)
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.changes.subscribe()
    }
}

fn encode(key: &str, user: &User) -> Result<String, StorageError> {
    serde_json::to_string(user).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })
}
