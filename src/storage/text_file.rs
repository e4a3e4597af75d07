//! Durable storage: one text file per key.

use super::error::{StorageError, StorageErrorKind};
use super::serializer::Serializer;
use super::Storage;
use std::fs;
use std::io::{ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument, warn};

/// Extension of record files.
const EXTENSION: &str = "txt";

/// Stores each record as `<dir>/<key>.txt` using a [`Serializer`].
///
/// Records are written to a temporary file in `dir` and renamed into
/// place, so a reader sees either the old record or the new one. There is
/// no locking: two processes writing the same key race and the last write
/// wins.
#[derive(Debug)]
pub struct TextFileStorage<D, S> {
    dir: PathBuf,
    serializer: S,
    _data: PhantomData<fn() -> D>,
}

impl<D, S: Serializer<D>> TextFileStorage<D, S> {
    /// Opens (creating if needed) the directory `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the directory cannot be created.
    #[instrument(skip(dir, serializer), fields(dir = %dir.as_ref().display()))]
    pub fn new(dir: impl AsRef<Path>, serializer: S) -> Result<Self, StorageError> {
        fs::create_dir_all(dir.as_ref())?;
        info!("Text file storage ready");
        Ok(Self {
            dir: dir.as_ref().to_path_buf(),
            serializer,
            _data: PhantomData,
        })
    }

    /// Directory holding the record files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\'])
            && !key.chars().any(char::is_control);
        if !valid {
            warn!(key, "Rejected storage key");
            return Err(StorageError::new(StorageErrorKind::InvalidKey(key.to_string())));
        }
        Ok(self.dir.join(format!("{}.{}", key, EXTENSION)))
    }

    /// Serializes `data` into a temporary file next to the records.
    fn stage(&self, data: &D) -> Result<NamedTempFile, StorageError> {
        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(self.serializer.serialize(data).as_bytes())?;
        Ok(staged)
    }
}

impl<D, S> Storage<D> for TextFileStorage<D, S>
where
    D: std::fmt::Debug,
    S: Serializer<D>,
{
    #[instrument(skip(self, data))]
    fn create(&self, key: &str, data: &D) -> Result<(), StorageError> {
        let path = self.path(key)?;
        if path.exists() {
            warn!("Key already exists");
            return Err(StorageError::already_exists(key));
        }
        match self.stage(data)?.persist_noclobber(&path) {
            Ok(_) => {
                info!(path = %path.display(), "Record created");
                Ok(())
            }
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                warn!("Key already exists");
                Err(StorageError::already_exists(key))
            }
            Err(e) => Err(e.error.into()),
        }
    }

    #[instrument(skip(self))]
    fn read(&self, key: &str) -> Result<Option<D>, StorageError> {
        let path = self.path(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => {
                debug!(bytes = text.len(), "Record read");
                Ok(Some(self.serializer.deserialize(&text)?))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Record absent");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, data))]
    fn update(&self, key: &str, data: &D) -> Result<(), StorageError> {
        let path = self.path(key)?;
        if !path.is_file() {
            warn!("Key not found");
            return Err(StorageError::not_found(key));
        }
        self.stage(data)?.persist(&path).map_err(|e| e.error)?;
        info!(path = %path.display(), "Record updated");
        Ok(())
    }

    #[instrument(skip(self))]
    fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(path = %path.display(), "Record deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Key not found");
                Err(StorageError::not_found(key))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FormatError;

    /// Identity serializer so the file layout can be checked directly.
    #[derive(Debug)]
    struct Plain;

    impl Serializer<String> for Plain {
        fn serialize(&self, data: &String) -> String {
            data.clone()
        }

        fn deserialize(&self, text: &str) -> Result<String, FormatError> {
            Ok(text.to_string())
        }
    }

    #[test]
    fn test_one_file_per_key() {
        let dir = tempfile::tempdir().unwrap();
        let storage = TextFileStorage::new(dir.path(), Plain).unwrap();
        storage.create("g1", &"content".to_string()).unwrap();
        let on_disk = fs::read_to_string(dir.path().join("g1.txt")).unwrap();
        assert_eq!(on_disk, "content");
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("games").join("nested");
        let storage = TextFileStorage::new(&nested, Plain).unwrap();
        assert!(nested.is_dir());
        assert_eq!(storage.dir(), nested.as_path());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = TextFileStorage::new(dir.path(), Plain).unwrap();
        for key in ["", "..", "a/b", "a\\b"] {
            let err = storage.read(key).unwrap_err();
            assert!(matches!(err.kind, StorageErrorKind::InvalidKey(_)), "{key:?}");
        }
    }

    #[test]
    fn test_readers_never_see_partial_records() {
        use std::sync::atomic::{AtomicBool, Ordering};

        let dir = tempfile::tempdir().unwrap();
        let writer = TextFileStorage::new(dir.path(), Plain).unwrap();
        let reader = TextFileStorage::new(dir.path(), Plain).unwrap();
        let short = "BLACK - false - 27:WHITE".to_string();
        let long = "WHITE - true - 19:BLACK 27:BLACK 28:BLACK 35:BLACK 36:WHITE".to_string();
        writer.create("g", &short).unwrap();

        let done = AtomicBool::new(false);
        std::thread::scope(|scope| {
            scope.spawn(|| {
                for i in 0..2000 {
                    let next = if i % 2 == 0 { &long } else { &short };
                    writer.update("g", next).unwrap();
                }
                done.store(true, Ordering::SeqCst);
            });

            let mut reads = 0;
            while !done.load(Ordering::SeqCst) || reads == 0 {
                let seen = reader.read("g").unwrap().expect("record present");
                assert!(seen == short || seen == long, "partial record {seen:?}");
                reads += 1;
            }
        });
    }

    #[test]
    fn test_create_leaves_no_staging_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = TextFileStorage::new(dir.path(), Plain).unwrap();
        storage.create("g1", &"one".to_string()).unwrap();
        storage.update("g1", &"two".to_string()).unwrap();
        let err = storage.create("g1", &"three".to_string()).unwrap_err();
        assert!(err.is_already_exists());

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("g1.txt")]);
        assert_eq!(storage.read("g1").unwrap().as_deref(), Some("two"));
    }
}
