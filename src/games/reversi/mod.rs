//! Reversi (Othello) rules: positions, the immutable board, and the game wrapper.

mod board;
mod game;
mod position;
mod types;

pub use board::{Board, MoveError};
pub use game::Game;
pub use position::{BOARD_CELLS, BOARD_SIZE, Position, PositionError};
pub use types::{GameResult, Player, Score};
