//! Game wrapper: board plus display preferences, with derived result.

use super::board::{Board, MoveError};
use super::position::Position;
use super::types::{GameResult, Player};
use derive_getters::Getters;
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument};

/// Reversi game state.
///
/// `targets` only controls whether legal moves are highlighted when the
/// board is drawn; it never affects legality or the result.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Game {
    /// The board.
    board: Board,
    /// Show legal-move markers when rendering.
    targets: bool,
}

impl Game {
    /// Starts a fresh game with `first` to move.
    #[instrument]
    pub fn new(first: Player) -> Self {
        info!("Starting new game");
        Self {
            board: Board::initial(first),
            targets: false,
        }
    }

    /// Wraps an existing board, e.g. one read back from storage.
    pub fn from_board(board: Board, targets: bool) -> Self {
        Self { board, targets }
    }

    /// Plays at `pos` for the player to move.
    ///
    /// # Errors
    ///
    /// Propagates [`MoveError`] from [`Board::play`].
    #[instrument(skip(self))]
    pub fn play(&self, pos: Position) -> Result<Game, MoveError> {
        Ok(Self {
            board: self.board.play(pos)?,
            targets: self.targets,
        })
    }

    /// Hands the turn to the opponent without placing a piece.
    ///
    /// Whether the player actually had no legal move is not checked here.
    #[instrument(skip(self), fields(player = %self.board.turn()))]
    pub fn pass(&self) -> Game {
        debug!("Passing turn");
        Self {
            board: self.board.with_turn(self.board.turn().opponent()),
            targets: self.targets,
        }
    }

    /// Sets the hint flag to `on`, or flips it when `None`.
    pub fn toggle_targets(&self, on: Option<bool>) -> Game {
        Self {
            board: self.board.clone(),
            targets: on.unwrap_or(!self.targets),
        }
    }

    /// Ongoing while either player can move; otherwise decided by piece count.
    #[instrument(skip(self))]
    pub fn result(&self) -> GameResult {
        let can_move = Player::iter().any(|player| !self.board.valid_moves_for(player).is_empty());
        if can_move {
            return GameResult::Ongoing;
        }
        match self.board.score().leader() {
            Some(player) => GameResult::Winner(player),
            None => GameResult::Draw,
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(Player::Black)
    }
}
