//! Storage and format error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// Malformed serialized text, with location tracking.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Format error: {} at {}:{}", message, file, line)]
pub struct FormatError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl FormatError {
    /// Creates a new format error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// What went wrong in a storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum StorageErrorKind {
    /// `create` on a key that is already stored.
    #[display("'{}' already exists", _0)]
    AlreadyExists(String),

    /// `update` or `delete` on a key that is not stored.
    #[display("'{}' not found", _0)]
    NotFound(String),

    /// Key cannot be used by this backend.
    #[display("invalid key '{}'", _0)]
    InvalidKey(String),

    /// The stored text could not be decoded.
    #[display("{}", _0)]
    Format(FormatError),

    /// Filesystem failure.
    #[display("I/O error: {}", _0)]
    Io(String),

    /// Database failure.
    #[display("database error: {}", _0)]
    Database(String),

    /// A lock guarding in-process state was poisoned.
    #[display("storage lock poisoned")]
    Poisoned,
}

/// Storage error with location tracking.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Storage error: {} at {}:{}", kind, file, line)]
pub struct StorageError {
    /// What failed.
    pub kind: StorageErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StorageError {
    /// Creates a new storage error with caller location tracking.
    #[track_caller]
    #[instrument]
    pub fn new(kind: StorageErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Shorthand for [`StorageErrorKind::AlreadyExists`].
    #[track_caller]
    pub fn already_exists(key: &str) -> Self {
        Self::new(StorageErrorKind::AlreadyExists(key.to_string()))
    }

    /// Shorthand for [`StorageErrorKind::NotFound`].
    #[track_caller]
    pub fn not_found(key: &str) -> Self {
        Self::new(StorageErrorKind::NotFound(key.to_string()))
    }

    /// True for [`StorageErrorKind::AlreadyExists`].
    pub fn is_already_exists(&self) -> bool {
        matches!(self.kind, StorageErrorKind::AlreadyExists(_))
    }

    /// True for [`StorageErrorKind::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, StorageErrorKind::NotFound(_))
    }
}

impl From<FormatError> for StorageError {
    #[track_caller]
    fn from(err: FormatError) -> Self {
        Self::new(StorageErrorKind::Format(err))
    }
}

impl From<std::io::Error> for StorageError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(StorageErrorKind::Io(err.to_string()))
    }
}

impl From<diesel::result::Error> for StorageError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::new(StorageErrorKind::Database(format!("Diesel error: {}", err)))
    }
}

impl From<diesel::ConnectionError> for StorageError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(StorageErrorKind::Database(format!("Connection error: {}", err)))
    }
}
