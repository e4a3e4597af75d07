//! Process-lifetime storage backed by a map.

use super::Storage;
use super::error::{StorageError, StorageErrorKind};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

/// In-memory storage. Nothing survives the process.
#[derive(Debug)]
pub struct MemoryStorage<D> {
    entries: Mutex<HashMap<String, D>>,
}

impl<D> MemoryStorage<D> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<String, D>>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::new(StorageErrorKind::Poisoned))
    }
}

impl<D> Default for MemoryStorage<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Storage<D> for MemoryStorage<D>
where
    D: Clone + std::fmt::Debug + Send,
{
    #[instrument(skip(self, data))]
    fn create(&self, key: &str, data: &D) -> Result<(), StorageError> {
        let mut entries = self.entries()?;
        if entries.contains_key(key) {
            warn!("Key already exists");
            return Err(StorageError::already_exists(key));
        }
        entries.insert(key.to_string(), data.clone());
        info!("Entry created");
        Ok(())
    }

    #[instrument(skip(self))]
    fn read(&self, key: &str) -> Result<Option<D>, StorageError> {
        let found = self.entries()?.get(key).cloned();
        debug!(found = found.is_some(), "Entry read");
        Ok(found)
    }

    #[instrument(skip(self, data))]
    fn update(&self, key: &str, data: &D) -> Result<(), StorageError> {
        let mut entries = self.entries()?;
        match entries.get_mut(key) {
            Some(entry) => {
                *entry = data.clone();
                info!("Entry updated");
                Ok(())
            }
            None => {
                warn!("Key not found");
                Err(StorageError::not_found(key))
            }
        }
    }

    #[instrument(skip(self))]
    fn delete(&self, key: &str) -> Result<(), StorageError> {
        if self.entries()?.remove(key).is_none() {
            warn!("Key not found");
            return Err(StorageError::not_found(key));
        }
        info!("Entry deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crud_cycle() {
        let storage = MemoryStorage::new();
        storage.create("g1", &"content".to_string()).unwrap();
        assert_eq!(storage.read("g1").unwrap().as_deref(), Some("content"));

        storage.update("g1", &"new".to_string()).unwrap();
        assert_eq!(storage.read("g1").unwrap().as_deref(), Some("new"));

        storage.delete("g1").unwrap();
        assert_eq!(storage.read("g1").unwrap(), None);
    }

    #[test]
    fn test_contract_failures() {
        let storage = MemoryStorage::new();
        storage.create("g1", &1).unwrap();
        assert!(storage.create("g1", &2).unwrap_err().is_already_exists());
        assert_eq!(storage.read("g1").unwrap(), Some(1));
        assert!(storage.update("missing", &3).unwrap_err().is_not_found());
        assert!(storage.delete("missing").unwrap_err().is_not_found());
    }
}
