//! Core domain types for reversi.

use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString};

/// Player in the game.
///
/// The textual name (`BLACK` / `WHITE`) is what gets persisted; the glyph
/// is what gets drawn on the board.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    EnumString,
    EnumIter,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Player {
    /// Black pieces (`#`), moves first by default.
    #[default]
    Black,
    /// White pieces (`@`).
    White,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    /// Display glyph for this player's pieces.
    pub fn symbol(self) -> char {
        match self {
            Player::Black => '#',
            Player::White => '@',
        }
    }

    /// Looks a player up by its display glyph.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '#' => Some(Player::Black),
            '@' => Some(Player::White),
            _ => None,
        }
    }
}

/// Outcome of a game, always derived from the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum GameResult {
    /// At least one player can still move.
    #[display("Game in progress")]
    Ongoing,
    /// Nobody can move and piece counts are equal.
    #[display("Draw")]
    Draw,
    /// Nobody can move and this player holds more pieces.
    #[display("{} wins", _0)]
    Winner(Player),
}

impl GameResult {
    /// True once neither player has a legal move.
    pub fn is_over(self) -> bool {
        !matches!(self, GameResult::Ongoing)
    }
}

/// Piece counts per player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_new::new)]
pub struct Score {
    /// Black pieces on the board.
    pub black: usize,
    /// White pieces on the board.
    pub white: usize,
}

impl Score {
    /// Count for one player.
    pub fn of(&self, player: Player) -> usize {
        match player {
            Player::Black => self.black,
            Player::White => self.white,
        }
    }

    /// Occupied cells in total.
    pub fn total(&self) -> usize {
        self.black + self.white
    }

    /// Player with strictly more pieces, if any.
    pub fn leader(&self) -> Option<Player> {
        use std::cmp::Ordering;
        match self.black.cmp(&self.white) {
            Ordering::Greater => Some(Player::Black),
            Ordering::Less => Some(Player::White),
            Ordering::Equal => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_opponent_swaps() {
        assert_eq!(Player::Black.opponent(), Player::White);
        assert_eq!(Player::White.opponent(), Player::Black);
        assert_eq!(Player::Black.opponent().opponent(), Player::Black);
    }

    #[test]
    fn test_names_and_symbols() {
        assert_eq!(Player::Black.to_string(), "BLACK");
        assert_eq!(Player::from_str("WHITE").unwrap(), Player::White);
        assert!(Player::from_str("GREEN").is_err());
        assert_eq!(Player::from_symbol('@'), Some(Player::White));
        assert_ne!(Player::Black.symbol(), Player::White.symbol());
    }

    #[test]
    fn test_score_leader() {
        assert_eq!(Score::new(40, 24).leader(), Some(Player::Black));
        assert_eq!(Score::new(10, 12).leader(), Some(Player::White));
        assert_eq!(Score::new(32, 32).leader(), None);
        assert_eq!(Score::new(3, 1).total(), 4);
    }
}
