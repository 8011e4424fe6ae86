//! Key-value storage capability consumed by repositories.
//!
//! # Responsibility
//! - Define the string-keyed get/set/delete contract every backend honors.
//! - Name the storage keys that make up the persisted data format.
//!
//! # Invariants
//! - `set` replaces the whole value for one key; readers never observe a
//!   partially written value.
//! - Values are serialized JSON text; backends never interpret them.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod key_lock;
mod memory;
mod sqlite;

pub use key_lock::{lock_key, KeyLockGuard};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Storage key for the ordered `List` collection.
pub const LISTS_KEY: &str = "lists";
/// Storage key for the ordered `Subscription` collection.
pub const SUBSCRIPTIONS_KEY: &str = "subscriptions";
/// Storage key for the preferred currency code.
pub const DEFAULT_CURRENCY_KEY: &str = "default_currency";
/// Storage key for the user display name.
pub const USER_NAME_KEY: &str = "user_name";
/// Storage key for the onboarding completion flag.
pub const ONBOARDING_COMPLETE_KEY: &str = "onboarding_complete";

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by a storage backend.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Synchronous string-keyed storage primitive.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` when never set or deleted.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    /// Stores `value` under `key`, overwriting any prior value.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    /// Removes `key`. Removing an absent key is not an error.
    fn delete(&self, key: &str) -> StoreResult<()>;
}
