//! Stateless console rendering for reversi.

use crate::clash::Clash;
use crate::games::reversi::{BOARD_SIZE, Board, Game, GameResult, Player, Position};
use crossterm::style::{Color, Stylize, style};

/// Glyph for an empty cell.
const EMPTY: char = '.';

/// Glyph for a legal move when hints are on.
const TARGET: char = '*';

/// Draws boards as plain text, optionally with ANSI colours.
///
/// Black pieces are red, white pieces green, and legal-move hints yellow.
#[derive(Debug, Clone, Copy, derive_new::new)]
pub struct Renderer {
    color: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Renderer {
    fn paint(&self, text: impl std::fmt::Display, color: Color) -> String {
        if self.color {
            style(text).with(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn player_color(player: Player) -> Color {
        match player {
            Player::Black => Color::Red,
            Player::White => Color::Green,
        }
    }

    fn piece(&self, player: Player) -> String {
        self.paint(player.symbol(), Self::player_color(player))
    }

    /// The grid with `a`..`h` across and `1`..`8` down.
    pub fn board(&self, board: &Board, show_targets: bool) -> String {
        let targets = if show_targets {
            board.valid_moves()
        } else {
            Default::default()
        };

        let mut out = String::from("   ");
        for col in 0..BOARD_SIZE {
            out.push((b'a' + col as u8) as char);
            out.push(' ');
        }
        out.push('\n');

        for pos in Position::all() {
            if pos.col() == 0 {
                out.push_str(&format!("{}  ", pos.row() + 1));
            }
            let cell = match board.get(pos) {
                Some(player) => self.piece(player),
                None if targets.contains(&pos) => self.paint(TARGET, Color::Yellow),
                None => EMPTY.to_string(),
            };
            out.push_str(&cell);
            out.push(if pos.col() == BOARD_SIZE - 1 { '\n' } else { ' ' });
        }
        out
    }

    /// Board, score line and turn line.
    pub fn game(&self, game: &Game) -> String {
        let board = game.board();
        let score = board.score();
        let mut out = self.board(board, *game.targets());
        out.push('\n');
        out.push_str(&format!(
            "{} | {}\n",
            self.paint(format!("{} = {}", Player::Black.symbol(), score.black), Color::Red),
            self.paint(format!("{} = {}", Player::White.symbol(), score.white), Color::Green),
        ));
        out.push_str(&format!("Turn: {}\n", self.piece(board.turn())));
        match game.result() {
            GameResult::Ongoing => {}
            result => out.push_str(&format!("Game over: {}\n", result)),
        }
        out
    }

    /// Game view plus the local side and clash name; a hint when idle.
    pub fn clash(&self, clash: &Clash) -> String {
        match clash.running() {
            Some(run) => format!(
                "{}You: {} | Clash: {}\n",
                self.game(run.game()),
                self.piece(*run.side()),
                run.name()
            ),
            None => "No clash running. Use 'new' or 'join'.\n".to_string(),
        }
    }
}
