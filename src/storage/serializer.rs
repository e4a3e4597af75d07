//! Text encoding of stored records.

use super::error::FormatError;
use crate::games::reversi::{Board, Game, Player, Position};
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::{debug, instrument, warn};

/// Converts values to and from a single line of text.
pub trait Serializer<D>: std::fmt::Debug + Send + Sync {
    /// Encodes `data`.
    fn serialize(&self, data: &D) -> String;

    /// Decodes `text`.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`] when `text` is malformed.
    fn deserialize(&self, text: &str) -> Result<D, FormatError>;
}

/// Field delimiter of the game record.
const FIELD_DELIMITER: char = '-';

/// Serializer for reversi games.
///
/// Format: `<TURN> - <TARGETS> - <INDEX>:<PLAYER> ...`, e.g.
/// `BLACK - false - 27:WHITE 28:BLACK 35:BLACK 36:WHITE`.
/// Cells are written in index order; the cell list may be empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct GameSerializer;

impl Serializer<Game> for GameSerializer {
    fn serialize(&self, data: &Game) -> String {
        let cells = data
            .board()
            .cells()
            .map(|(pos, player)| format!("{}:{}", pos.index(), player))
            .collect::<Vec<_>>()
            .join(" ");
        format!("{} - {} - {}", data.board().turn(), data.targets(), cells)
    }

    #[instrument(skip(self))]
    fn deserialize(&self, text: &str) -> Result<Game, FormatError> {
        let fields: Vec<&str> = text
            .trim_end_matches(['\r', '\n'])
            .splitn(3, FIELD_DELIMITER)
            .collect();
        let [turn, targets, cells] = fields.as_slice() else {
            warn!(fields = fields.len(), "Wrong number of fields");
            return Err(FormatError::new(format!(
                "Invalid game format: expected 3 fields, found {}",
                fields.len()
            )));
        };

        let turn = parse_player(turn.trim())?;
        let targets = match targets.trim() {
            "true" => true,
            "false" => false,
            other => {
                return Err(FormatError::new(format!("Invalid targets flag '{}'", other)));
            }
        };

        let mut parsed = BTreeMap::new();
        for entry in cells.split_whitespace() {
            let (index, player) = entry
                .split_once(':')
                .ok_or_else(|| FormatError::new(format!("Invalid cell entry '{}'", entry)))?;
            let index: usize = index
                .parse()
                .map_err(|_| FormatError::new(format!("Invalid cell index '{}'", index)))?;
            let pos = Position::from_index(index).map_err(|e| FormatError::new(e.to_string()))?;
            if parsed.insert(pos, parse_player(player)?).is_some() {
                return Err(FormatError::new(format!("Cell {} listed twice", index)));
            }
        }

        debug!(cells = parsed.len(), %turn, targets, "Game decoded");
        Ok(Game::from_board(Board::from_cells(parsed, turn), targets))
    }
}

fn parse_player(name: &str) -> Result<Player, FormatError> {
    Player::from_str(name).map_err(|_| FormatError::new(format!("Unknown player '{}'", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_initial_game() {
        let text = GameSerializer.serialize(&Game::new(Player::Black));
        assert_eq!(text, "BLACK - false - 27:WHITE 28:BLACK 35:BLACK 36:WHITE");
    }

    #[test]
    fn test_round_trip_after_moves() {
        let game = Game::new(Player::White)
            .play("e3".parse().unwrap())
            .unwrap()
            .pass()
            .toggle_targets(Some(true));
        let copy = GameSerializer.deserialize(&GameSerializer.serialize(&game)).unwrap();
        assert_eq!(copy, game);
    }

    #[test]
    fn test_round_trip_through_whole_games() {
        for (first, seed) in [(Player::Black, 0), (Player::White, 3), (Player::Black, 7)] {
            let mut game = Game::new(first);
            for step in 0..200usize {
                let copy = GameSerializer.deserialize(&GameSerializer.serialize(&game)).unwrap();
                assert_eq!(copy, game, "step {step}");
                if game.result().is_over() {
                    break;
                }
                let moves: Vec<_> = game.board().valid_moves().into_iter().collect();
                game = match moves.get((step + seed) % moves.len().max(1)) {
                    Some(pos) => game.play(*pos).unwrap(),
                    None => game.pass(),
                };
                if step % 5 == 0 {
                    game = game.toggle_targets(None);
                }
            }
            assert!(game.result().is_over());
        }
    }

    #[test]
    fn test_deserialize_empty_cells() {
        let game = GameSerializer.deserialize("BLACK - false - ").unwrap();
        assert_eq!(game.board().turn(), Player::Black);
        assert_eq!(game.board().occupied(), 0);
        assert!(!*game.targets());

        // A trimmed trailing space still has three fields.
        let game = GameSerializer.deserialize("WHITE - true -\n").unwrap();
        assert_eq!(game.board().turn(), Player::White);
        assert!(*game.targets());
    }

    #[test]
    fn test_deserialize_rejects_malformed() {
        for bad in [
            "",
            "BLACK",
            "BLACK - false",
            "GREEN - false - ",
            "BLACK - maybe - ",
            "BLACK - false - 27",
            "BLACK - false - 64:BLACK",
            "BLACK - false - x:BLACK",
            "BLACK - false - 27:PURPLE",
            "BLACK - false - 27:BLACK 27:WHITE",
        ] {
            assert!(GameSerializer.deserialize(bad).is_err(), "{bad:?} should be rejected");
        }
    }
}
