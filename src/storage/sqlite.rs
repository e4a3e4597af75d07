//! Durable storage in a SQLite database.

use super::Storage;
use super::error::StorageError;
use super::schema::clashes;
use super::serializer::Serializer;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::marker::PhantomData;
use tracing::{debug, info, instrument, warn};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS clashes (
    name TEXT PRIMARY KEY NOT NULL,
    record TEXT NOT NULL
)";

/// Stores records as serialized text in a single `clashes` table.
///
/// A connection is opened per operation, so the path must name a file;
/// `":memory:"` would hand every call a fresh, empty database.
#[derive(Debug)]
pub struct SqliteStorage<D, S> {
    db_path: String,
    serializer: S,
    _data: PhantomData<fn() -> D>,
}

impl<D, S: Serializer<D>> SqliteStorage<D, S> {
    /// Opens the database at `db_path`, creating the table if missing.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the database cannot be opened.
    #[instrument(skip(db_path, serializer), fields(db_path = %db_path.as_ref()))]
    pub fn new(db_path: impl AsRef<str>, serializer: S) -> Result<Self, StorageError> {
        let storage = Self {
            db_path: db_path.as_ref().to_string(),
            serializer,
            _data: PhantomData,
        };
        let mut conn = storage.connection()?;
        diesel::sql_query(CREATE_TABLE).execute(&mut conn)?;
        info!("SQLite storage ready");
        Ok(storage)
    }

    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, StorageError> {
        debug!(path = %self.db_path, "Establishing connection");
        Ok(SqliteConnection::establish(&self.db_path)?)
    }
}

impl<D, S> Storage<D> for SqliteStorage<D, S>
where
    D: std::fmt::Debug,
    S: Serializer<D>,
{
    #[instrument(skip(self, data))]
    fn create(&self, key: &str, data: &D) -> Result<(), StorageError> {
        let mut conn = self.connection()?;
        let inserted = diesel::insert_into(clashes::table)
            .values((
                clashes::name.eq(key),
                clashes::record.eq(self.serializer.serialize(data)),
            ))
            .execute(&mut conn);
        match inserted {
            Ok(_) => {
                info!("Record created");
                Ok(())
            }
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                warn!("Key already exists");
                Err(StorageError::already_exists(key))
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    fn read(&self, key: &str) -> Result<Option<D>, StorageError> {
        let mut conn = self.connection()?;
        let record = clashes::table
            .find(key)
            .select(clashes::record)
            .first::<String>(&mut conn)
            .optional()?;
        debug!(found = record.is_some(), "Record read");
        record
            .map(|text| self.serializer.deserialize(&text).map_err(StorageError::from))
            .transpose()
    }

    #[instrument(skip(self, data))]
    fn update(&self, key: &str, data: &D) -> Result<(), StorageError> {
        let mut conn = self.connection()?;
        let updated = diesel::update(clashes::table.find(key))
            .set(clashes::record.eq(self.serializer.serialize(data)))
            .execute(&mut conn)?;
        if updated == 0 {
            warn!("Key not found");
            return Err(StorageError::not_found(key));
        }
        info!("Record updated");
        Ok(())
    }

    #[instrument(skip(self))]
    fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut conn = self.connection()?;
        let deleted = diesel::delete(clashes::table.find(key)).execute(&mut conn)?;
        if deleted == 0 {
            warn!("Key not found");
            return Err(StorageError::not_found(key));
        }
        info!("Record deleted");
        Ok(())
    }
}
