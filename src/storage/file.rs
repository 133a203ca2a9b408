use crate::storage::{KeyValueStore, StorageError};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, info, warn};

/// JSON object on disk, rewritten as a whole on every `set`. A file that
/// cannot be parsed is treated as empty and replaced on the next write.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: RwLock<HashMap<String, String>>,
}

impl FileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(data) if data.trim().is_empty() => HashMap::new(),
            Ok(data) => match serde_json::from_str(&data) {
                Ok(values) => values,
                Err(e) => {
                    warn!("ignoring unreadable preferences at {}: {e}", path.display());
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("no preferences file at {}, starting empty", path.display());
                HashMap::new()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    fn flush(&self, values: &HashMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let data = serde_json::to_string_pretty(values)?;
        // staged copy renamed into place; the old file stays whole until then
        let staged = self.path.with_extension("json.tmp");
        fs::write(&staged, data)?;
        fs::rename(&staged, &self.path)?;
        debug!("preferences written to {}", self.path.display());
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.read().map_err(|_| StorageError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.write().map_err(|_| StorageError::Poisoned)?;
        let mut updated = values.clone();
        updated.insert(key.to_string(), value.to_string());
        self.flush(&updated)?;
        *values = updated;
        Ok(())
    }
}
