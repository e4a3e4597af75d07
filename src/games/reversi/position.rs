//! Validated board coordinates.

use std::str::FromStr;
use tracing::instrument;

/// Side length of the board.
pub const BOARD_SIZE: usize = 8;

/// Number of cells on the board.
pub const BOARD_CELLS: usize = BOARD_SIZE * BOARD_SIZE;

/// A cell on the 8x8 board, stored as its row-major index (0-63).
///
/// Positions can only be built through [`Position::of`],
/// [`Position::from_index`] or parsing, so an out-of-range value never
/// exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position(u8);

/// Error building a position from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum PositionError {
    /// Row or column outside `0..8`.
    #[display("Position ({}, {}) is off the board", row, col)]
    RowColOutOfRange {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },

    /// Linear index outside `0..64`.
    #[display("Index {} is off the board (must be 0-63)", _0)]
    IndexOutOfRange(usize),

    /// Text that is neither `a1`..`h8` nor an index.
    #[display("Invalid position: {}", _0)]
    InvalidNotation(String),
}

impl std::error::Error for PositionError {}

impl Position {
    /// Creates a position from row and column.
    ///
    /// # Errors
    ///
    /// Returns [`PositionError::RowColOutOfRange`] unless both are in `0..8`.
    pub fn of(row: usize, col: usize) -> Result<Self, PositionError> {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return Err(PositionError::RowColOutOfRange { row, col });
        }
        Ok(Self((row * BOARD_SIZE + col) as u8))
    }

    /// Creates a position from its linear index.
    ///
    /// # Errors
    ///
    /// Returns [`PositionError::IndexOutOfRange`] unless `index` is in `0..64`.
    pub fn from_index(index: usize) -> Result<Self, PositionError> {
        if index >= BOARD_CELLS {
            return Err(PositionError::IndexOutOfRange(index));
        }
        Ok(Self(index as u8))
    }

    /// Row-major index (0-63).
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// Row (0-7), top to bottom.
    pub fn row(self) -> usize {
        self.index() / BOARD_SIZE
    }

    /// Column (0-7), left to right.
    pub fn col(self) -> usize {
        self.index() % BOARD_SIZE
    }

    /// All 64 positions in index order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_CELLS as u8).map(Position)
    }

    /// Neighbour one step along `(dr, dc)`, or `None` past the edge.
    pub fn step(self, dr: isize, dc: isize) -> Option<Position> {
        let row = self.row().checked_add_signed(dr)?;
        let col = self.col().checked_add_signed(dc)?;
        Position::of(row, col).ok()
    }

    /// Board notation: column letter then 1-based row, e.g. `d3`.
    pub fn notation(self) -> String {
        let col = (b'a' + self.col() as u8) as char;
        format!("{}{}", col, self.row() + 1)
    }

    /// Parses `a1`..`h8` (column letter case-insensitive).
    #[instrument]
    pub fn from_notation(s: &str) -> Option<Position> {
        let mut chars = s.chars();
        let (col, row) = match (chars.next(), chars.next(), chars.next()) {
            (Some(col), Some(row), None) => (col.to_ascii_lowercase(), row),
            _ => return None,
        };
        if !('a'..='h').contains(&col) {
            return None;
        }
        let row = row.to_digit(10)?.checked_sub(1)? as usize;
        Position::of(row, col as usize - 'a' as usize).ok()
    }
}

impl FromStr for Position {
    type Err = PositionError;

    /// Accepts a raw index (`0`-`63`, plain digits without a sign or
    /// leading zeros) or board notation (`d3`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || PositionError::InvalidNotation(s.to_string());
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            if s.len() > 1 && s.starts_with('0') {
                return Err(invalid());
            }
            let index = s.parse::<usize>().map_err(|_| invalid())?;
            return Position::from_index(index);
        }
        Position::from_notation(s).ok_or_else(invalid)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.notation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_col_round_trip() {
        let pos = Position::of(2, 3).unwrap();
        assert_eq!(pos.index(), 19);
        assert_eq!((pos.row(), pos.col()), (2, 3));
        assert_eq!(Position::from_index(19).unwrap(), pos);
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert_eq!(
            Position::of(8, 0),
            Err(PositionError::RowColOutOfRange { row: 8, col: 0 })
        );
        assert!(Position::of(0, 8).is_err());
        assert_eq!(Position::from_index(64), Err(PositionError::IndexOutOfRange(64)));
        assert!(Position::from_index(63).is_ok());
    }

    #[test]
    fn test_notation() {
        let d3 = Position::of(2, 3).unwrap();
        assert_eq!(d3.notation(), "d3");
        assert_eq!("d3".parse::<Position>().unwrap(), d3);
        assert_eq!("D3".parse::<Position>().unwrap(), d3);
        assert_eq!("19".parse::<Position>().unwrap(), d3);
        assert_eq!("h8".parse::<Position>().unwrap().index(), 63);
        assert_eq!("a1".parse::<Position>().unwrap().index(), 0);
    }

    #[test]
    fn test_malformed_notation() {
        for bad in ["", "i1", "a0", "a9", "d33", "zz", "-1"] {
            assert!(bad.parse::<Position>().is_err(), "{bad} should be rejected");
        }
        assert_eq!(
            "64".parse::<Position>(),
            Err(PositionError::IndexOutOfRange(64))
        );
    }

    #[test]
    fn test_index_must_be_plain_digits() {
        for bad in ["+5", "007", "05", " +19", "1_9", "99999999999999999999999"] {
            assert_eq!(
                bad.parse::<Position>(),
                Err(PositionError::InvalidNotation(bad.trim().to_string())),
                "{bad} should be rejected"
            );
        }
        assert_eq!("0".parse::<Position>().unwrap().index(), 0);
        assert_eq!("5".parse::<Position>().unwrap().index(), 5);
    }

    #[test]
    fn test_step_stops_at_edges() {
        let corner = Position::of(0, 0).unwrap();
        assert_eq!(corner.step(-1, 0), None);
        assert_eq!(corner.step(0, -1), None);
        assert_eq!(corner.step(1, 1), Position::of(1, 1).ok());
        let far = Position::of(7, 7).unwrap();
        assert_eq!(far.step(1, 0), None);
        assert_eq!(far.step(0, 1), None);
    }

    #[test]
    fn test_all_positions() {
        let all: Vec<_> = Position::all().collect();
        assert_eq!(all.len(), BOARD_CELLS);
        assert_eq!(all[63].notation(), "h8");
    }
}
