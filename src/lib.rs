//! Reversi Clash library - reversi engine with storage-backed multiplayer
//!
//! Two processes play one game by taking turns on a record in shared
//! storage. There is no live connection: each side writes its move and the
//! other side polls with `refresh`.
//!
//! # Architecture
//!
//! - **Games**: immutable reversi board, move generation and results
//! - **Storage**: keyed CRUD backends (memory, text files, SQLite) and the
//!   text serializer for game records
//! - **Clash**: session state machine enforcing turn ownership
//! - **Shell**: command parsing and console rendering
//!
//! # Example
//!
//! ```
//! use reversi_clash::{Clash, Player, memory_storage};
//!
//! # fn example() -> Result<(), reversi_clash::ClashError> {
//! let storage = memory_storage();
//! let black = Clash::new(storage.clone()).start("match", Player::Black)?;
//! let white = Clash::new(storage).join("match")?;
//!
//! let black = black.play("d3".parse().expect("valid notation"))?;
//! let white = white.refresh()?;
//! assert_eq!(white.game(), black.game());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod clash;
mod command;
mod config;
mod games;
mod render;
mod shell;
mod storage;

// Crate-level exports - Game types (reversi)
pub use games::reversi::{
    BOARD_CELLS, BOARD_SIZE, Board, Game, GameResult, MoveError, Player, Position, PositionError,
    Score,
};

// Crate-level exports - Storage
pub use storage::{
    FormatError, GameSerializer, GameStorage, MemoryStorage, Serializer, SqliteStorage, Storage,
    StorageError, StorageErrorKind, TextFileStorage, memory_storage, sqlite_storage,
    text_file_storage,
};

// Crate-level exports - Session management
pub use clash::{Clash, ClashError, ClashRun};

// Crate-level exports - Shell
pub use command::{Command, CommandError, USAGE};
pub use config::{Backend, ConfigError, ReversiConfig};
pub use render::Renderer;
pub use shell::{Flow, LOCAL_CLASH, Shell, ShellError};
