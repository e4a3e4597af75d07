//! Immutable reversi board and the capture algorithm.

use super::position::{BOARD_SIZE, Position};
use super::types::{Player, Score};
use im::OrdMap;
use std::collections::BTreeSet;
use tracing::{debug, instrument, warn};

/// The eight compass directions as `(row, col)` steps.
const DIRECTIONS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Error applying a move to a board. The board is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The cell already holds a piece.
    #[display("Square {} is already occupied", _0)]
    Occupied(Position),

    /// Placing here would not flip anything.
    #[display("Invalid move at {}: nothing to capture", _0)]
    NoCaptures(Position),
}

impl std::error::Error for MoveError {}

/// Reversi board: occupied cells plus whose turn it is.
///
/// Cells live in a persistent [`OrdMap`], so cloning is O(1) and every
/// [`Board::play`] returns a new board sharing structure with the old one.
/// Empty cells are simply absent from the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: OrdMap<Position, Player>,
    turn: Player,
}

impl Board {
    /// Standard opening: four centre pieces, `first` to move.
    ///
    /// White holds `d4`/`e5`, black holds `e4`/`d5`.
    #[instrument]
    pub fn initial(first: Player) -> Self {
        let mid = BOARD_SIZE / 2;
        let centre = [
            (mid - 1, mid - 1, Player::White),
            (mid, mid, Player::White),
            (mid - 1, mid, Player::Black),
            (mid, mid - 1, Player::Black),
        ];
        let cells = centre
            .into_iter()
            .filter_map(|(row, col, player)| Position::of(row, col).ok().map(|pos| (pos, player)))
            .collect();
        Self { cells, turn: first }
    }

    /// Rebuilds a board from stored cells. Later duplicates win.
    pub fn from_cells(cells: impl IntoIterator<Item = (Position, Player)>, turn: Player) -> Self {
        Self {
            cells: cells.into_iter().collect(),
            turn,
        }
    }

    /// Player to move.
    pub fn turn(&self) -> Player {
        self.turn
    }

    /// Same pieces, different player to move.
    pub fn with_turn(&self, turn: Player) -> Self {
        Self {
            cells: self.cells.clone(),
            turn,
        }
    }

    /// Piece at `pos`, if any.
    pub fn get(&self, pos: Position) -> Option<Player> {
        self.cells.get(&pos).copied()
    }

    /// True when no piece sits at `pos`.
    pub fn is_empty(&self, pos: Position) -> bool {
        !self.cells.contains_key(&pos)
    }

    /// Occupied cells in index order.
    pub fn cells(&self) -> impl Iterator<Item = (Position, Player)> + '_ {
        self.cells.iter().map(|(pos, player)| (*pos, *player))
    }

    /// Number of occupied cells.
    pub fn occupied(&self) -> usize {
        self.cells.len()
    }

    /// Opponent pieces `player` would flip by placing at `pos`.
    ///
    /// Empty when `pos` is occupied. A direction contributes only if its
    /// run of opponent pieces ends on one of `player`'s own pieces; hitting
    /// an empty cell or the edge first discards the run.
    pub fn captures(&self, pos: Position, player: Player) -> Vec<Position> {
        if !self.is_empty(pos) {
            return Vec::new();
        }
        let mut flips = Vec::new();
        for (dr, dc) in DIRECTIONS {
            let mut run = Vec::new();
            let mut cursor = pos.step(dr, dc);
            while let Some(cell) = cursor {
                match self.get(cell) {
                    Some(piece) if piece == player.opponent() => run.push(cell),
                    Some(_) => {
                        flips.append(&mut run);
                        break;
                    }
                    None => break,
                }
                cursor = cell.step(dr, dc);
            }
        }
        flips
    }

    /// Legal moves for the player to move.
    pub fn valid_moves(&self) -> BTreeSet<Position> {
        self.valid_moves_for(self.turn)
    }

    /// Legal moves for `player`, regardless of whose turn it is.
    #[instrument(skip(self))]
    pub fn valid_moves_for(&self, player: Player) -> BTreeSet<Position> {
        let moves: BTreeSet<_> = Position::all()
            .filter(|pos| !self.captures(*pos, player).is_empty())
            .collect();
        debug!(count = moves.len(), "Computed valid moves");
        moves
    }

    /// Places the current player's piece at `pos` and flips every capture.
    ///
    /// The returned board has the turn passed to the opponent, even if the
    /// opponent then has no legal move.
    ///
    /// # Errors
    ///
    /// [`MoveError::Occupied`] if the cell holds a piece,
    /// [`MoveError::NoCaptures`] if nothing would flip.
    #[instrument(skip(self), fields(position = %pos, player = %self.turn))]
    pub fn play(&self, pos: Position) -> Result<Board, MoveError> {
        if !self.is_empty(pos) {
            warn!("Square already occupied");
            return Err(MoveError::Occupied(pos));
        }
        let flips = self.captures(pos, self.turn);
        if flips.is_empty() {
            warn!("Move captures nothing");
            return Err(MoveError::NoCaptures(pos));
        }

        let mut cells = self.cells.clone();
        cells.insert(pos, self.turn);
        for cell in &flips {
            cells.insert(*cell, self.turn);
        }
        debug!(flipped = flips.len(), "Move applied");

        Ok(Board {
            cells,
            turn: self.turn.opponent(),
        })
    }

    /// Piece counts per player.
    pub fn score(&self) -> Score {
        self.cells
            .values()
            .fold(Score::default(), |mut score, player| {
                match player {
                    Player::Black => score.black += 1,
                    Player::White => score.white += 1,
                }
                score
            })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial(Player::Black)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(notation: &str) -> Position {
        notation.parse().unwrap()
    }

    #[test]
    fn test_initial_layout() {
        let board = Board::initial(Player::Black);
        assert_eq!(board.get(pos("d4")), Some(Player::White));
        assert_eq!(board.get(pos("e5")), Some(Player::White));
        assert_eq!(board.get(pos("e4")), Some(Player::Black));
        assert_eq!(board.get(pos("d5")), Some(Player::Black));
        assert_eq!(board.occupied(), 4);
        assert_eq!(board.turn(), Player::Black);
        assert_eq!(Board::initial(Player::White).turn(), Player::White);
    }

    #[test]
    fn test_initial_valid_moves() {
        let moves = Board::default().valid_moves();
        let expected: BTreeSet<_> = ["d3", "c4", "f5", "e6"].into_iter().map(pos).collect();
        assert_eq!(moves, expected);
    }

    #[test]
    fn test_capture_needs_closing_piece() {
        // Black at a1, white at b1 and c1, d1 empty: no capture towards the edge.
        let board = Board::from_cells(
            [
                (pos("a1"), Player::Black),
                (pos("b1"), Player::White),
                (pos("c1"), Player::White),
            ],
            Player::Black,
        );
        assert_eq!(board.captures(pos("d1"), Player::Black), vec![pos("c1"), pos("b1")]);
        // For white the neighbour at c1 is its own piece, so the run is empty.
        assert!(board.captures(pos("d1"), Player::White).is_empty());
        assert!(board.captures(pos("a1"), Player::Black).is_empty());
    }

    #[test]
    fn test_captures_in_several_directions() {
        // e5 is surrounded by white runs closed by black in two directions.
        let board = Board::from_cells(
            [
                (pos("e4"), Player::White),
                (pos("e3"), Player::Black),
                (pos("d5"), Player::White),
                (pos("c5"), Player::Black),
                (pos("f6"), Player::White),
            ],
            Player::Black,
        );
        let flips: BTreeSet<_> = board.captures(pos("e5"), Player::Black).into_iter().collect();
        let expected: BTreeSet<_> = [pos("e4"), pos("d5")].into_iter().collect();
        assert_eq!(flips, expected);

        let next = board.play(pos("e5")).unwrap();
        assert_eq!(next.get(pos("e4")), Some(Player::Black));
        assert_eq!(next.get(pos("d5")), Some(Player::Black));
        assert_eq!(next.get(pos("f6")), Some(Player::White));
        assert_eq!(next.turn(), Player::White);
    }

    #[test]
    fn test_play_rejects_occupied_and_empty_captures() {
        let board = Board::default();
        assert_eq!(board.play(pos("d4")), Err(MoveError::Occupied(pos("d4"))));
        assert_eq!(board.play(pos("a1")), Err(MoveError::NoCaptures(pos("a1"))));
    }

    #[test]
    fn test_play_leaves_source_board_intact() {
        let board = Board::default();
        let next = board.play(pos("d3")).unwrap();
        assert_eq!(board, Board::default());
        assert_ne!(board, next);
    }

    #[test]
    fn test_score_counts_pieces() {
        let score = Board::default().score();
        assert_eq!((score.black, score.white), (2, 2));
        assert_eq!(score.total(), 4);
    }
}
