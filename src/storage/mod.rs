//! Small key-value persistence used for client preferences such as the
//! user's email address.

mod errors;
pub mod file;
pub mod in_memory;

use crate::configuration::{StorageSettings, StorageType};
use crate::errors::Error;
pub use errors::StorageError;
use file::FileStore;
use in_memory::MemoryStore;
use std::fmt::Debug;
use std::sync::Arc;

/// Key under which the user's alert email is persisted.
pub const USER_EMAIL_KEY: &str = "userEmail";

pub trait KeyValueStore: Debug + Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

pub fn from_settings(settings: &StorageSettings) -> Result<Arc<dyn KeyValueStore>, Error> {
    settings.is_valid()?;
    match settings.storage_type {
        StorageType::InMemory => Ok(Arc::new(MemoryStore::default())),
        StorageType::File => {
            let store = FileStore::open(settings.file_path()?)?;
            Ok(Arc::new(store))
        }
    }
}
