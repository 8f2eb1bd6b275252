use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use weather_garden_core::CreatureId;

/// Identifier assigned to a user record by the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u32);

impl UserId {
    /// Creates a new user identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Persisted user together with the creatures they have collected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Identifier allocated by the store.
    pub id: UserId,
    /// Display name chosen by the user.
    pub name: String,
    /// Collected creatures in capture order, without duplicates.
    pub collected: Vec<CreatureId>,
}

/// Errors raised by collection stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No user with the provided identifier exists.
    #[error("user {} does not exist", .0.get())]
    MissingUser(UserId),
    /// A user with the provided name already exists.
    #[error("user '{0}' already exists")]
    DuplicateUser(String),
    /// Reading or writing the backing file failed.
    #[error("failed to access collection file {}", .path.display())]
    Io {
        /// File that could not be accessed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The backing file does not contain a valid collection document.
    #[error("collection file {} is malformed", .path.display())]
    Malformed {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },
    /// The in-memory records could not be encoded.
    #[error("failed to encode collection records")]
    Encode(#[source] serde_json::Error),
}

/// CRUD surface over user records and their collected creatures.
pub trait CollectionStore {
    /// Creates a new user with an empty collection.
    fn create_user(&mut self, name: &str) -> Result<UserRecord, StoreError>;

    /// Looks up a user by identifier.
    fn user(&self, id: UserId) -> Option<UserRecord>;

    /// Looks up a user by display name.
    fn user_named(&self, name: &str) -> Option<UserRecord>;

    /// Every stored user in creation order.
    fn users(&self) -> Vec<UserRecord>;

    /// Appends `creature` to the user's collection.
    ///
    /// Returns `false` when the creature was already collected.
    fn record_capture(&mut self, id: UserId, creature: CreatureId) -> Result<bool, StoreError>;

    /// Removes a user and their collection.
    fn delete_user(&mut self, id: UserId) -> Result<(), StoreError>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
struct Records {
    next_id: u32,
    users: Vec<UserRecord>,
}

impl Records {
    fn create_user(&mut self, name: &str) -> Result<UserRecord, StoreError> {
        if self.users.iter().any(|user| user.name == name) {
            return Err(StoreError::DuplicateUser(name.to_owned()));
        }

        let record = UserRecord {
            id: UserId::new(self.next_id),
            name: name.to_owned(),
            collected: Vec::new(),
        };
        self.next_id = self.next_id.wrapping_add(1);
        self.users.push(record.clone());
        Ok(record)
    }

    fn user(&self, id: UserId) -> Option<&UserRecord> {
        self.users.iter().find(|user| user.id == id)
    }

    fn user_named(&self, name: &str) -> Option<&UserRecord> {
        self.users.iter().find(|user| user.name == name)
    }

    fn record_capture(&mut self, id: UserId, creature: CreatureId) -> Result<bool, StoreError> {
        let user = self
            .users
            .iter_mut()
            .find(|user| user.id == id)
            .ok_or(StoreError::MissingUser(id))?;
        if user.collected.contains(&creature) {
            return Ok(false);
        }
        user.collected.push(creature);
        Ok(true)
    }

    fn delete_user(&mut self, id: UserId) -> Result<(), StoreError> {
        let position = self
            .users
            .iter()
            .position(|user| user.id == id)
            .ok_or(StoreError::MissingUser(id))?;
        let _ = self.users.remove(position);
        Ok(())
    }
}

/// Store that keeps every record in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    records: Records,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CollectionStore for MemoryStore {
    fn create_user(&mut self, name: &str) -> Result<UserRecord, StoreError> {
        self.records.create_user(name)
    }

    fn user(&self, id: UserId) -> Option<UserRecord> {
        self.records.user(id).cloned()
    }

    fn user_named(&self, name: &str) -> Option<UserRecord> {
        self.records.user_named(name).cloned()
    }

    fn users(&self) -> Vec<UserRecord> {
        self.records.users.clone()
    }

    fn record_capture(&mut self, id: UserId, creature: CreatureId) -> Result<bool, StoreError> {
        self.records.record_capture(id, creature)
    }

    fn delete_user(&mut self, id: UserId) -> Result<(), StoreError> {
        self.records.delete_user(id)
    }
}

/// Store that writes every mutation through to a JSON document on disk.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    records: Records,
}

impl JsonFileStore {
    /// Opens the store at `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let records = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|source| {
                StoreError::Malformed {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(error) if error.kind() == io::ErrorKind::NotFound => Records::default(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        Ok(Self { path, records })
    }

    /// File backing the store.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(&self.records).map_err(StoreError::Encode)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn mutate<T>(
        &mut self,
        change: impl FnOnce(&mut Records) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut staged = self.records.clone();
        let outcome = change(&mut staged)?;
        let previous = std::mem::replace(&mut self.records, staged);
        if let Err(error) = self.persist() {
            self.records = previous;
            return Err(error);
        }
        Ok(outcome)
    }
}

impl CollectionStore for JsonFileStore {
    fn create_user(&mut self, name: &str) -> Result<UserRecord, StoreError> {
        self.mutate(|records| records.create_user(name))
    }

    fn user(&self, id: UserId) -> Option<UserRecord> {
        self.records.user(id).cloned()
    }

    fn user_named(&self, name: &str) -> Option<UserRecord> {
        self.records.user_named(name).cloned()
    }

    fn users(&self) -> Vec<UserRecord> {
        self.records.users.clone()
    }

    fn record_capture(&mut self, id: UserId, creature: CreatureId) -> Result<bool, StoreError> {
        self.mutate(|records| records.record_capture(id, creature))
    }

    fn delete_user(&mut self, id: UserId) -> Result<(), StoreError> {
        self.mutate(|records| records.delete_user(id))
    }
}
