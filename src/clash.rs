//! Clash sessions: two processes taking turns on a shared stored game.
//!
//! A [`Clash`] binds a named record in a [`GameStorage`] to the local
//! player's side. Every operation returns a new `Clash`; on error the
//! caller still holds the previous value. Storage is only polled on
//! [`Clash::refresh`], so the cached game can go stale.

use crate::games::reversi::{Game, GameResult, MoveError, Player, Position};
use crate::storage::{GameStorage, StorageError};
use derive_getters::Getters;
use tracing::{debug, info, instrument, warn};

/// Error from a clash operation.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::From)]
pub enum ClashError {
    /// The operation needs a running clash.
    #[display("Not in a running clash")]
    NotRunning,

    /// `start` on a name that is already stored.
    #[display("Clash {} already exists", _0)]
    NameTaken(String),

    /// `join` on a name that is not stored.
    #[display("Clash {} not found", _0)]
    NotFound(String),

    /// The local side does not hold the turn.
    #[display("Not your turn: you play {}, waiting for {}", side, turn)]
    NotYourTurn {
        /// Local side.
        side: Player,
        /// Player holding the turn.
        turn: Player,
    },

    /// `refresh` read back exactly the cached game.
    #[display("No changes in clash {}", _0)]
    NoChanges(String),

    /// The engine rejected the move.
    #[display("{}", _0)]
    #[from]
    Move(MoveError),

    /// The storage backend failed.
    #[display("{}", _0)]
    #[from]
    Storage(StorageError),
}

impl std::error::Error for ClashError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClashError::Move(e) => Some(e),
            ClashError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

/// A running clash: name, cached game and local side.
#[derive(Debug, Clone, Getters)]
pub struct ClashRun {
    /// Backend holding the shared record.
    storage: GameStorage,
    /// Storage key of the record.
    name: String,
    /// Last game read from or written to storage.
    game: Game,
    /// Side played by this process.
    side: Player,
}

impl ClashRun {
    fn with_game(&self, game: Game) -> Self {
        Self {
            storage: self.storage.clone(),
            name: self.name.clone(),
            game,
            side: self.side,
        }
    }

    fn ensure_turn(&self) -> Result<(), ClashError> {
        let turn = self.game.board().turn();
        if turn != self.side {
            warn!(name = %self.name, side = %self.side, %turn, "Not this side's turn");
            return Err(ClashError::NotYourTurn {
                side: self.side,
                turn,
            });
        }
        Ok(())
    }

    /// Writes `game` under the clash name, then adopts it as the snapshot.
    fn publish(&self, game: Game) -> Result<Clash, ClashError> {
        self.storage.update(&self.name, &game)?;
        Ok(Clash::Running(self.with_game(game)))
    }
}

/// Session state: idle, or running on a named stored game.
#[derive(Debug, Clone)]
pub enum Clash {
    /// No game bound yet.
    Idle(GameStorage),
    /// Bound to a stored game.
    Running(ClashRun),
}

impl Clash {
    /// Idle clash over `storage`.
    pub fn new(storage: GameStorage) -> Self {
        Clash::Idle(storage)
    }

    /// Backend this clash reads and writes.
    pub fn storage(&self) -> &GameStorage {
        match self {
            Clash::Idle(storage) => storage,
            Clash::Running(run) => &run.storage,
        }
    }

    /// The running state, if any.
    pub fn running(&self) -> Option<&ClashRun> {
        match self {
            Clash::Running(run) => Some(run),
            Clash::Idle(_) => None,
        }
    }

    /// Cached game, if running.
    pub fn game(&self) -> Option<&Game> {
        self.running().map(|run| &run.game)
    }

    fn require_running(&self) -> Result<&ClashRun, ClashError> {
        self.running().ok_or_else(|| {
            warn!("Operation requires a running clash");
            ClashError::NotRunning
        })
    }

    /// Creates the record `name` with a fresh game and plays `first`.
    ///
    /// # Errors
    ///
    /// [`ClashError::NameTaken`] if `name` is already stored; other storage
    /// faults as [`ClashError::Storage`].
    #[instrument(skip(self))]
    pub fn start(&self, name: &str, first: Player) -> Result<Clash, ClashError> {
        let storage = self.storage().clone();
        let game = Game::new(first);
        storage.create(name, &game).map_err(|e| {
            if e.is_already_exists() {
                warn!("Clash name already taken");
                ClashError::NameTaken(name.to_string())
            } else {
                e.into()
            }
        })?;
        info!(side = %first, "Clash started");
        Ok(Clash::Running(ClashRun {
            storage,
            name: name.to_string(),
            game,
            side: first,
        }))
    }

    /// Binds to the existing record `name`, taking the side opposite to
    /// whoever holds the turn there.
    ///
    /// # Errors
    ///
    /// [`ClashError::NotFound`] if `name` is not stored.
    #[instrument(skip(self))]
    pub fn join(&self, name: &str) -> Result<Clash, ClashError> {
        let storage = self.storage().clone();
        let game = storage.read(name)?.ok_or_else(|| {
            warn!("Clash not found");
            ClashError::NotFound(name.to_string())
        })?;
        let side = game.board().turn().opponent();
        info!(%side, "Joined clash");
        Ok(Clash::Running(ClashRun {
            storage,
            name: name.to_string(),
            game,
            side,
        }))
    }

    /// Plays `pos` for the local side and writes the result.
    ///
    /// A stale snapshot still overwrites whatever is stored.
    ///
    /// # Errors
    ///
    /// [`ClashError::NotRunning`], [`ClashError::NotYourTurn`],
    /// [`ClashError::Move`] or [`ClashError::Storage`]. Nothing is written
    /// on failure.
    #[instrument(skip(self))]
    pub fn play(&self, pos: Position) -> Result<Clash, ClashError> {
        let run = self.require_running()?;
        run.ensure_turn()?;
        let game = run.game.play(pos)?;
        info!(name = %run.name, side = %run.side, %pos, "Move played");
        run.publish(game)
    }

    /// Passes the local side's turn and writes the result.
    ///
    /// Passing is accepted even when legal moves remain.
    ///
    /// # Errors
    ///
    /// [`ClashError::NotRunning`], [`ClashError::NotYourTurn`] or
    /// [`ClashError::Storage`].
    #[instrument(skip(self))]
    pub fn pass(&self) -> Result<Clash, ClashError> {
        let run = self.require_running()?;
        run.ensure_turn()?;
        let legal = run.game.board().valid_moves().len();
        if legal > 0 {
            warn!(name = %run.name, legal, "Passing with legal moves available");
        }
        info!(name = %run.name, side = %run.side, "Turn passed");
        run.publish(run.game.pass())
    }

    /// Re-reads the record and adopts its board.
    ///
    /// Only the board is compared and adopted; the local hint flag is kept.
    ///
    /// # Errors
    ///
    /// [`ClashError::NoChanges`] if storage holds the cached board,
    /// [`ClashError::NotFound`] if the record disappeared.
    #[instrument(skip(self))]
    pub fn refresh(&self) -> Result<Clash, ClashError> {
        let run = self.require_running()?;
        let stored = run
            .storage
            .read(&run.name)?
            .ok_or_else(|| ClashError::NotFound(run.name.clone()))?;
        if stored.board() == run.game.board() {
            debug!(name = %run.name, "Refresh found no changes");
            return Err(ClashError::NoChanges(run.name.clone()));
        }
        info!(name = %run.name, turn = %stored.board().turn(), "Clash refreshed");
        let game = Game::from_board(stored.board().clone(), *run.game.targets());
        Ok(Clash::Running(run.with_game(game)))
    }

    /// Sets or flips the local move-hint flag. Not written to storage.
    ///
    /// # Errors
    ///
    /// [`ClashError::NotRunning`] when idle.
    #[instrument(skip(self))]
    pub fn toggle_targets(&self, on: Option<bool>) -> Result<Clash, ClashError> {
        let run = self.require_running()?;
        Ok(Clash::Running(run.with_game(run.game.toggle_targets(on))))
    }

    /// Removes the record `name`. Drops back to idle if this clash was
    /// running on it.
    ///
    /// # Errors
    ///
    /// [`ClashError::NotFound`] if `name` is not stored.
    #[instrument(skip(self))]
    pub fn delete(&self, name: &str) -> Result<Clash, ClashError> {
        self.storage().delete(name).map_err(|e| {
            if e.is_not_found() {
                ClashError::NotFound(name.to_string())
            } else {
                e.into()
            }
        })?;
        info!("Clash deleted");
        match self {
            Clash::Running(run) if run.name == name => Ok(Clash::Idle(run.storage.clone())),
            _ => Ok(self.clone()),
        }
    }

    /// Result of the cached game.
    ///
    /// # Errors
    ///
    /// [`ClashError::NotRunning`] when idle.
    pub fn result(&self) -> Result<GameResult, ClashError> {
        Ok(self.require_running()?.game.result())
    }
}
