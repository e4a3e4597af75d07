//! Interactive shell driving a clash from text commands.

use crate::clash::{Clash, ClashError};
use crate::command::{Command, CommandError};
use crate::games::reversi::Player;
use crate::render::Renderer;
use crate::storage::{GameStorage, memory_storage};
use tracing::{debug, instrument, warn};

/// Clash name that always runs on a private in-memory store.
pub const LOCAL_CLASH: &str = "local";

/// Error from one shell command.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::From)]
pub enum ShellError {
    /// The line did not parse.
    #[display("{}", _0)]
    Command(CommandError),
    /// The clash rejected the operation.
    #[display("{}", _0)]
    Clash(ClashError),
}

impl std::error::Error for ShellError {}

/// What the caller should do after a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Print the text and read the next line.
    Continue(String),
    /// Leave the loop.
    Exit,
}

/// Holds the current clash between commands.
#[derive(Debug)]
pub struct Shell {
    clash: Clash,
    durable: GameStorage,
    renderer: Renderer,
    default_side: Player,
}

impl Shell {
    /// Shell over `durable` for named clashes.
    pub fn new(durable: GameStorage, renderer: Renderer, default_side: Player) -> Self {
        Self {
            clash: Clash::new(durable.clone()),
            durable,
            renderer,
            default_side,
        }
    }

    /// Current clash.
    pub fn clash(&self) -> &Clash {
        &self.clash
    }

    /// Runs one input line. Failures become an `Error: ...` line and leave
    /// the clash as it was.
    #[instrument(skip(self))]
    pub fn handle_line(&mut self, line: &str) -> Flow {
        if line.trim().is_empty() {
            return Flow::Continue(String::new());
        }
        match self.execute(line) {
            Ok(flow) => flow,
            Err(e) => {
                warn!(error = %e, "Command failed");
                Flow::Continue(format!("Error: {}\n", e))
            }
        }
    }

    fn execute(&mut self, line: &str) -> Result<Flow, ShellError> {
        let command: Command = line.parse()?;
        debug!(?command, "Parsed command");

        let (next, banner) = match command {
            Command::Exit => return Ok(Flow::Exit),
            Command::Show => return Ok(Flow::Continue(self.renderer.clash(&self.clash))),
            Command::New { side, name } => {
                let side = side.unwrap_or(self.default_side);
                let name = name.unwrap_or_else(|| LOCAL_CLASH.to_string());
                let storage = if name == LOCAL_CLASH {
                    memory_storage()
                } else {
                    self.durable.clone()
                };
                (Clash::new(storage).start(&name, side)?, true)
            }
            Command::Join(name) => (Clash::new(self.durable.clone()).join(&name)?, true),
            Command::Play(pos) => (self.clash.play(pos)?, false),
            Command::Pass => (self.clash.pass()?, false),
            Command::Refresh => (self.clash.refresh()?, false),
            Command::Targets(on) => (self.clash.toggle_targets(on)?, false),
            Command::Delete(name) => {
                if self.is_local() {
                    Clash::new(self.durable.clone()).delete(&name)?;
                } else {
                    self.clash = self.clash.delete(&name)?;
                }
                return Ok(Flow::Continue(format!("Clash {} deleted\n", name)));
            }
        };

        self.clash = next;
        let mut out = String::new();
        if banner && let Some(run) = self.clash.running() {
            out.push_str(&format!(
                "You are player {} in game {}\n",
                run.side().symbol(),
                run.name()
            ));
        }
        out.push_str(&self.renderer.clash(&self.clash));
        Ok(Flow::Continue(out))
    }

    fn is_local(&self) -> bool {
        self.clash
            .running()
            .is_some_and(|run| run.name() == LOCAL_CLASH)
    }
}
