use crate::aggregate::{EndRow, Scoreboard, Totals};
use crate::correction::{CorrectionFlow, CorrectionState};
use crate::edit_log::EditEntry;
use crate::error::{ScoreError, ScoreResult};
use crate::game::Game;
use crate::side::Side;

/// High-level session wrapper binding a game to its correction workflow.
///
/// All interaction state lives here and is passed around explicitly; there is
/// no process-wide current game.
#[derive(Debug, Clone)]
pub struct ScoreSession {
    game: Game,
    correction: CorrectionFlow,
}

impl ScoreSession {
    #[must_use]
    pub const fn new(game: Game) -> Self {
        Self {
            game,
            correction: CorrectionFlow::new(),
        }
    }

    /// Record the next end.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::InvalidInput`] for a negative margin or a
    /// tie with a nonzero margin.
    pub fn record_end(&mut self, margin: i32, winner: Side) -> ScoreResult<i32> {
        self.game.record_end(margin, winner)
    }

    /// Open a correction for `end_index`.
    ///
    /// # Errors
    ///
    /// See [`CorrectionFlow::select`].
    pub fn begin_correction(&mut self, end_index: usize) -> ScoreResult<()> {
        self.correction.select(&self.game, end_index)
    }

    /// # Errors
    ///
    /// See [`CorrectionFlow::choose_side`].
    pub fn choose_side(&mut self, side: Side) -> ScoreResult<()> {
        self.correction.choose_side(side)
    }

    /// # Errors
    ///
    /// See [`CorrectionFlow::choose_margin`].
    pub fn choose_margin(&mut self, margin: u32) -> ScoreResult<()> {
        self.correction.choose_margin(margin)
    }

    /// # Errors
    ///
    /// See [`CorrectionFlow::confirm`].
    pub fn confirm_correction(&mut self) -> ScoreResult<i32> {
        self.correction.confirm()
    }

    /// # Errors
    ///
    /// See [`CorrectionFlow::commit`].
    pub fn commit_correction(&mut self) -> ScoreResult<EditEntry> {
        self.correction.commit(&mut self.game)
    }

    pub fn cancel_correction(&mut self) {
        self.correction.cancel();
    }

    /// Run a whole correction in one call. A failure after the workflow was
    /// opened here cancels it, so it is never left half-open.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::InvalidInput`] without touching anything when a
    /// stepwise correction is already open; otherwise the first error raised
    /// by the workflow. The game is unchanged on error.
    pub fn correct_end(
        &mut self,
        end_index: usize,
        side: Side,
        margin: u32,
    ) -> ScoreResult<EditEntry> {
        if !self.correction.state().is_idle() {
            return Err(ScoreError::invalid(format!(
                "cannot correct end index {end_index} while {:?} is open",
                self.correction.state()
            )));
        }
        let result = self.drive_correction(end_index, side, margin);
        if result.is_err() {
            self.correction.cancel();
        }
        result
    }

    fn drive_correction(
        &mut self,
        end_index: usize,
        side: Side,
        margin: u32,
    ) -> ScoreResult<EditEntry> {
        if side.is_tie() && margin != 0 {
            return Err(ScoreError::InvalidInput(format!(
                "a tied end cannot carry a margin (got {margin})"
            )));
        }
        self.begin_correction(end_index)?;
        self.choose_side(side)?;
        if !side.is_tie() {
            self.choose_margin(margin)?;
            self.confirm_correction()?;
        }
        self.commit_correction()
    }

    #[must_use]
    pub const fn correction_state(&self) -> CorrectionState {
        self.correction.state()
    }

    #[must_use]
    pub const fn game(&self) -> &Game {
        &self.game
    }

    #[must_use]
    pub fn totals(&self) -> Totals {
        self.game.totals()
    }

    #[must_use]
    pub fn rows(&self) -> Vec<EndRow> {
        self.game.rows()
    }

    #[must_use]
    pub fn scoreboard(&self) -> Scoreboard {
        self.game.scoreboard()
    }

    /// Consume the session, returning the game. An open correction is dropped.
    #[must_use]
    pub fn into_game(self) -> Game {
        self.game
    }
}
