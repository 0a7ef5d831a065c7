//! Endtally Score Ledger
//!
//! Platform-agnostic scorekeeping for two-sided games played in ends. The
//! ledger stores one signed value per end, totals are always derived from it,
//! and corrections go through an explicit workflow that appends to an audit
//! log. Rendering and storage technology are left to the caller.

pub mod aggregate;
pub mod constants;
pub mod correction;
pub mod edit_log;
pub mod error;
pub mod game;
pub mod ledger;
pub mod session;
pub mod side;
pub mod storage;

// Re-export commonly used types
pub use aggregate::{EndRow, Scoreboard, Totals, compute_rows, compute_totals, scoreboard};
pub use constants::{DEFAULT_SAVE_KEY, DEFAULT_SIDE_A_LABEL, DEFAULT_SIDE_B_LABEL, MAX_END_MARGIN};
pub use correction::{CorrectionFlow, CorrectionState};
pub use edit_log::{EditEntry, EditLog};
pub use error::{ScoreError, ScoreResult};
pub use game::Game;
pub use ledger::EndLedger;
pub use session::ScoreSession;
pub use side::{EndOutcome, Side, parse_margin, signed_value};
pub use storage::MemoryStorage;

/// Trait for abstracting save/load operations.
/// Platform-specific implementations should provide this.
pub trait GameStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Save game state under `key`, replacing any previous record.
    ///
    /// # Errors
    ///
    /// Returns an error if the game state cannot be saved.
    fn save_game(&self, key: &str, game: &Game) -> Result<(), Self::Error>;

    /// Load game state, `None` when nothing is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored record cannot be read or parsed.
    fn load_game(&self, key: &str) -> Result<Option<Game>, Self::Error>;

    /// Delete the record under `key`; deleting a missing record is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be deleted.
    fn delete_save(&self, key: &str) -> Result<(), Self::Error>;
}

/// Entry point tying a storage backend to game lifecycle operations.
///
/// Storage errors surface as [`ScoreError::PersistenceFailure`]; the engine
/// never retries and never touches in-memory state on failure.
pub struct ScoreEngine<S>
where
    S: GameStorage,
{
    storage: S,
}

impl<S> ScoreEngine<S>
where
    S: GameStorage,
{
    /// Create a new engine over the provided storage.
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Load the game stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::NotFound`] when nothing is stored and
    /// [`ScoreError::PersistenceFailure`] when the record cannot be read.
    pub fn load(&self, key: &str) -> ScoreResult<Game> {
        match self.storage.load_game(key) {
            Ok(Some(game)) => {
                log::info!("loaded game {} with {} ends", game.id(), game.ends());
                Ok(game)
            }
            Ok(None) => Err(ScoreError::NotFound {
                key: key.to_string(),
            }),
            Err(err) => Err(persistence_failure("load", key, &err)),
        }
    }

    /// Load the stored game, or start a fresh one when none exists.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::PersistenceFailure`] when the record exists but
    /// cannot be read; absence is never an error here.
    pub fn load_or_create(&self, key: &str) -> ScoreResult<Game> {
        match self.load(key) {
            Err(ScoreError::NotFound { .. }) => {
                log::info!("no saved game under {key:?}; starting a new one");
                Ok(Game::create())
            }
            other => other,
        }
    }

    /// Open a session on the stored game, creating one if needed.
    ///
    /// # Errors
    ///
    /// See [`ScoreEngine::load_or_create`].
    pub fn open_session(&self, key: &str) -> ScoreResult<ScoreSession> {
        self.load_or_create(key).map(ScoreSession::new)
    }

    /// Save a game state.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::PersistenceFailure`] if the storage rejects the write.
    pub fn save(&self, key: &str, game: &Game) -> ScoreResult<()> {
        self.storage
            .save_game(key, game)
            .map_err(|err| persistence_failure("save", key, &err))?;
        log::debug!("saved game {} ({} ends) under {key:?}", game.id(), game.ends());
        Ok(())
    }

    /// Discard the stored game and hand back a fresh one. The fresh game is
    /// not saved until the caller does so.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::PersistenceFailure`] if the old record cannot be deleted.
    pub fn reset(&self, key: &str) -> ScoreResult<Game> {
        self.storage
            .delete_save(key)
            .map_err(|err| persistence_failure("delete", key, &err))?;
        log::info!("reset game under {key:?}");
        Ok(Game::create())
    }
}

fn persistence_failure(action: &str, key: &str, err: &dyn std::error::Error) -> ScoreError {
    log::warn!("failed to {action} game under {key:?}: {err}");
    ScoreError::PersistenceFailure(format!("{action} {key:?}: {err}"))
}
