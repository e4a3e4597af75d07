//! Keyed storage for game records.
//!
//! Storage stands in for a network: two players share a record by key and
//! take turns writing it. Backends only promise keyed create/read/update/
//! delete; there is no versioning, so concurrent writers race and the last
//! write wins.

mod error;
mod memory;
mod schema;
mod serializer;
mod sqlite;
mod text_file;

pub use error::{FormatError, StorageError, StorageErrorKind};
pub use memory::MemoryStorage;
pub use serializer::{GameSerializer, Serializer};
pub use sqlite::SqliteStorage;
pub use text_file::TextFileStorage;

use crate::games::reversi::Game;
use std::sync::Arc;

/// Keyed CRUD over stored values.
///
/// All calls are synchronous and complete (or fail) before returning.
pub trait Storage<D>: std::fmt::Debug + Send + Sync {
    /// Stores `data` under a new `key`.
    ///
    /// # Errors
    ///
    /// [`StorageErrorKind::AlreadyExists`] if `key` is taken.
    fn create(&self, key: &str, data: &D) -> Result<(), StorageError>;

    /// Reads the value under `key`, `None` if absent.
    ///
    /// # Errors
    ///
    /// Backend faults, or [`StorageErrorKind::Format`] for corrupt records.
    fn read(&self, key: &str) -> Result<Option<D>, StorageError>;

    /// Replaces the value under an existing `key`.
    ///
    /// # Errors
    ///
    /// [`StorageErrorKind::NotFound`] if `key` is absent.
    fn update(&self, key: &str, data: &D) -> Result<(), StorageError>;

    /// Removes `key`.
    ///
    /// # Errors
    ///
    /// [`StorageErrorKind::NotFound`] if `key` is absent.
    fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Shared handle to a game store, as held by a clash.
pub type GameStorage = Arc<dyn Storage<Game>>;

/// Fresh in-memory game store.
pub fn memory_storage() -> GameStorage {
    Arc::new(MemoryStorage::<Game>::new())
}

/// Game store writing one text file per clash under `dir`.
///
/// # Errors
///
/// Returns [`StorageError`] if the directory cannot be created.
pub fn text_file_storage(dir: impl AsRef<std::path::Path>) -> Result<GameStorage, StorageError> {
    Ok(Arc::new(TextFileStorage::<Game, _>::new(dir, GameSerializer)?))
}

/// Game store in the SQLite database at `db_path`.
///
/// # Errors
///
/// Returns [`StorageError`] if the database cannot be opened.
pub fn sqlite_storage(db_path: impl AsRef<str>) -> Result<GameStorage, StorageError> {
    Ok(Arc::new(SqliteStorage::<Game, _>::new(db_path, GameSerializer)?))
}
