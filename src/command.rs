//! Line-based commands for the interactive shell.

use crate::games::reversi::{Player, Position, PositionError};
use std::str::FromStr;
use tracing::instrument;

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `new [#|@] [name]`: start a clash.
    New {
        /// Side to play, from its glyph.
        side: Option<Player>,
        /// Clash name; `local` or absent means in-memory.
        name: Option<String>,
    },
    /// `join <name>`: join a stored clash.
    Join(String),
    /// `play <d3|19>`: place a piece.
    Play(Position),
    /// `pass`: give up the turn.
    Pass,
    /// `refresh`: re-read the stored clash.
    Refresh,
    /// `targets [on|off]`: set or flip move hints.
    Targets(Option<bool>),
    /// `show`: redraw the board.
    Show,
    /// `delete <name>`: remove a stored clash.
    Delete(String),
    /// `exit`: leave the shell.
    Exit,
}

/// Error parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::From)]
pub enum CommandError {
    /// Blank line.
    #[display("Empty command")]
    Empty,

    /// Unknown verb.
    #[display("Invalid command: {}", _0)]
    Unknown(String),

    /// Required argument absent.
    #[display("Missing {}", _0)]
    MissingArgument(&'static str),

    /// Argument present but unusable.
    #[display("Invalid argument: {}", _0)]
    InvalidArgument(String),

    /// Position text rejected.
    #[display("{}", _0)]
    #[from]
    Position(PositionError),
}

impl std::error::Error for CommandError {}

/// Usage line shown at startup.
pub const USAGE: &str = "Commands: new [#|@] [name], join <name>, play <d3|19>, pass, refresh, \
                         targets [on|off], show, delete <name>, exit";

impl FromStr for Command {
    type Err = CommandError;

    #[instrument]
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or(CommandError::Empty)?.to_lowercase();
        let args: Vec<&str> = words.collect();

        let command = match verb.as_str() {
            "new" => parse_new(&args),
            "join" => Command::Join(required(&args, "name")?.to_string()),
            "play" => Command::Play(required(&args, "position")?.parse()?),
            "pass" => Command::Pass,
            "refresh" => Command::Refresh,
            "targets" => Command::Targets(match args.first().map(|arg| arg.to_lowercase()) {
                None => None,
                Some(arg) if arg == "on" => Some(true),
                Some(arg) if arg == "off" => Some(false),
                Some(arg) => return Err(CommandError::InvalidArgument(arg)),
            }),
            "show" => Command::Show,
            "delete" => Command::Delete(required(&args, "name")?.to_string()),
            "exit" | "quit" => Command::Exit,
            _ => return Err(CommandError::Unknown(verb)),
        };
        Ok(command)
    }
}

fn required<'a>(args: &[&'a str], what: &'static str) -> Result<&'a str, CommandError> {
    args.first().copied().ok_or(CommandError::MissingArgument(what))
}

/// `new` takes an optional side glyph, then an optional name.
fn parse_new(args: &[&str]) -> Command {
    let mut args = args.iter().copied().peekable();
    let side = args.peek().and_then(|arg| {
        let mut chars = arg.chars();
        match (chars.next(), chars.next()) {
            (Some(symbol), None) => Player::from_symbol(symbol),
            _ => None,
        }
    });
    if side.is_some() {
        args.next();
    }
    Command::New {
        side,
        name: args.next().map(str::to_string),
    }
}
