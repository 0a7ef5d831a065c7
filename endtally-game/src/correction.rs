//! Correction workflow: pick an end, choose a new outcome, confirm, commit.
//!
//! The workflow never touches the game until [`CorrectionFlow::commit`]; every
//! other transition only moves between states. A transition that does not
//! apply to the current state fails with [`ScoreError::InvalidInput`] and
//! leaves the state as it was.
use serde::{Deserialize, Serialize};

use crate::edit_log::EditEntry;
use crate::error::{ScoreError, ScoreResult};
use crate::game::Game;
use crate::side::{EndOutcome, Side, signed_value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CorrectionState {
    #[default]
    Idle,
    /// An end is picked; no outcome chosen yet.
    Selecting { end_index: usize },
    /// Side A or B chosen; waiting for a margin.
    ChoosingSide { end_index: usize, side: Side },
    /// Side and margin chosen; not yet confirmed.
    ChoosingMargin {
        end_index: usize,
        side: Side,
        margin: u32,
    },
    /// Final value settled; commit applies it.
    Ready {
        end_index: usize,
        side: Side,
        value: i32,
    },
}

impl CorrectionState {
    /// End being corrected, if any.
    #[must_use]
    pub const fn end_index(&self) -> Option<usize> {
        match *self {
            Self::Idle => None,
            Self::Selecting { end_index }
            | Self::ChoosingSide { end_index, .. }
            | Self::ChoosingMargin { end_index, .. }
            | Self::Ready { end_index, .. } => Some(end_index),
        }
    }

    /// Margin currently held for side A or B, preserved across a side flip.
    const fn held_margin(&self) -> Option<u32> {
        match *self {
            Self::ChoosingMargin { side, margin, .. } if !side.is_tie() => Some(margin),
            Self::Ready { side, value, .. } if !side.is_tie() => Some(value.unsigned_abs()),
            _ => None,
        }
    }

    const fn chosen_side(&self) -> Option<Side> {
        match *self {
            Self::ChoosingSide { side, .. }
            | Self::ChoosingMargin { side, .. }
            | Self::Ready { side, .. } => Some(side),
            Self::Idle | Self::Selecting { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Drives one correction at a time. Holds the pre-edit value captured when
/// the end was picked so the surface can show "before" and "after".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrectionFlow {
    state: CorrectionState,
    before: Option<i32>,
}

impl CorrectionFlow {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: CorrectionState::Idle,
            before: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> CorrectionState {
        self.state
    }

    /// Value of the end when it was picked.
    #[must_use]
    pub const fn before(&self) -> Option<i32> {
        self.before
    }

    /// Before and after outcomes for display; `after` is `None` until a value
    /// can be derived.
    #[must_use]
    pub fn preview(&self) -> Option<(EndOutcome, Option<EndOutcome>)> {
        let before = EndOutcome::from_value(self.before?);
        let after = match self.state {
            CorrectionState::ChoosingMargin { side, margin, .. } => {
                Some(EndOutcome { side, margin })
            }
            CorrectionState::Ready { value, side, .. } => Some(EndOutcome {
                side,
                margin: value.unsigned_abs(),
            }),
            _ => None,
        };
        Some((before, after))
    }

    /// Pick an end to correct. Only valid from idle.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::InvalidInput`] if a correction is already open and
    /// [`ScoreError::OutOfRange`] if `end_index` is not a recorded end.
    pub fn select(&mut self, game: &Game, end_index: usize) -> ScoreResult<()> {
        if !self.state.is_idle() {
            return Err(self.rejected("select an end"));
        }
        let before = game.ledger().value_at(end_index)?;
        self.before = Some(before);
        self.state = CorrectionState::Selecting { end_index };
        log::debug!("correction opened for end index {end_index} (was {before})");
        Ok(())
    }

    /// Choose who took the end.
    ///
    /// Switching between A and B keeps a chosen margin and flips its sign.
    /// Switching to or from a tie clears it; a tie settles straight to zero.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::InvalidInput`] when no end is selected.
    pub fn choose_side(&mut self, side: Side) -> ScoreResult<()> {
        let Some(end_index) = self.state.end_index() else {
            return Err(self.rejected("choose a side"));
        };
        self.state = match (side, self.state.held_margin(), self.state) {
            (Side::Tie, _, _) => CorrectionState::Ready {
                end_index,
                side,
                value: 0,
            },
            (_, Some(margin), CorrectionState::Ready { .. }) => CorrectionState::Ready {
                end_index,
                side,
                value: signed_value(side, margin)?,
            },
            (_, Some(margin), _) => CorrectionState::ChoosingMargin {
                end_index,
                side,
                margin,
            },
            (_, None, _) => CorrectionState::ChoosingSide { end_index, side },
        };
        Ok(())
    }

    /// Choose the winning margin for side A or B.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::InvalidInput`] when no side (or a tie) is chosen,
    /// or the margin is out of the ledger's range.
    pub fn choose_margin(&mut self, margin: u32) -> ScoreResult<()> {
        let (Some(end_index), Some(side)) = (self.state.end_index(), self.state.chosen_side())
        else {
            return Err(self.rejected("choose a margin"));
        };
        if side.is_tie() {
            return Err(ScoreError::invalid("a tied end takes no margin"));
        }
        signed_value(side, margin)?;
        self.state = CorrectionState::ChoosingMargin {
            end_index,
            side,
            margin,
        };
        Ok(())
    }

    /// Settle the chosen side and margin into a final value.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::InvalidInput`] unless a margin has been chosen.
    pub fn confirm(&mut self) -> ScoreResult<i32> {
        let CorrectionState::ChoosingMargin {
            end_index,
            side,
            margin,
        } = self.state
        else {
            return Err(self.rejected("confirm"));
        };
        let value = signed_value(side, margin)?;
        self.state = CorrectionState::Ready {
            end_index,
            side,
            value,
        };
        Ok(value)
    }

    /// Apply the settled value to the game, log it and return to idle.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::InvalidInput`] unless ready. Errors from the
    /// ledger leave the workflow in its ready state.
    pub fn commit(&mut self, game: &mut Game) -> ScoreResult<EditEntry> {
        let CorrectionState::Ready {
            end_index, value, ..
        } = self.state
        else {
            return Err(self.rejected("commit"));
        };
        let entry = game.amend_end(end_index, value)?;
        log::info!(
            "end {} corrected: {} -> {}",
            end_index + 1,
            entry.old_value,
            entry.new_value
        );
        self.reset();
        Ok(entry)
    }

    /// Abandon the correction without touching the game.
    pub fn cancel(&mut self) {
        if let Some(end_index) = self.state.end_index() {
            log::debug!("correction for end index {end_index} cancelled");
        }
        self.reset();
    }

    fn reset(&mut self) {
        self.state = CorrectionState::Idle;
        self.before = None;
    }

    fn rejected(&self, action: &str) -> ScoreError {
        ScoreError::invalid(format!("cannot {action} while {:?}", self.state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> Game {
        let mut game = Game::new("g", 0);
        game.record_end(5, Side::A).unwrap();
        game.record_end(3, Side::B).unwrap();
        game.record_end(0, Side::Tie).unwrap();
        game
    }

    #[test]
    fn full_correction_amends_and_logs() {
        let mut game = game();
        let mut flow = CorrectionFlow::new();
        flow.select(&game, 1).unwrap();
        assert_eq!(flow.before(), Some(-3));
        flow.choose_side(Side::B).unwrap();
        assert!(matches!(
            flow.state(),
            CorrectionState::ChoosingSide { side: Side::B, .. }
        ));
        flow.choose_margin(7).unwrap();
        assert_eq!(flow.confirm(), Ok(-7));
        let entry = flow.commit(&mut game).unwrap();
        assert_eq!((entry.end_index, entry.old_value, entry.new_value), (1, -3, -7));
        assert!(flow.state().is_idle());
        assert_eq!(flow.before(), None);
        assert_eq!(game.snapshot(), vec![5, -7, 0]);
    }

    #[test]
    fn tie_short_circuits_to_ready() {
        let mut game = game();
        let mut flow = CorrectionFlow::new();
        flow.select(&game, 0).unwrap();
        flow.choose_side(Side::Tie).unwrap();
        assert_eq!(
            flow.state(),
            CorrectionState::Ready {
                end_index: 0,
                side: Side::Tie,
                value: 0
            }
        );
        assert!(flow.choose_margin(2).is_err());
        flow.commit(&mut game).unwrap();
        assert_eq!(game.snapshot(), vec![0, -3, 0]);
    }

    #[test]
    fn flipping_between_sides_keeps_margin() {
        let game = game();
        let mut flow = CorrectionFlow::new();
        flow.select(&game, 2).unwrap();
        flow.choose_side(Side::A).unwrap();
        flow.choose_margin(4).unwrap();
        flow.choose_side(Side::B).unwrap();
        assert_eq!(
            flow.state(),
            CorrectionState::ChoosingMargin {
                end_index: 2,
                side: Side::B,
                margin: 4
            }
        );
        assert_eq!(flow.confirm(), Ok(-4));
        flow.choose_side(Side::A).unwrap();
        assert_eq!(
            flow.state(),
            CorrectionState::Ready {
                end_index: 2,
                side: Side::A,
                value: 4
            }
        );
    }

    #[test]
    fn tie_clears_margin_both_ways() {
        let game = game();
        let mut flow = CorrectionFlow::new();
        flow.select(&game, 0).unwrap();
        flow.choose_side(Side::A).unwrap();
        flow.choose_margin(6).unwrap();
        flow.choose_side(Side::Tie).unwrap();
        flow.choose_side(Side::B).unwrap();
        assert_eq!(
            flow.state(),
            CorrectionState::ChoosingSide {
                end_index: 0,
                side: Side::B
            }
        );
        assert!(flow.confirm().is_err());
    }

    #[test]
    fn out_of_order_transitions_are_rejected() {
        let mut game = game();
        let mut flow = CorrectionFlow::new();
        assert!(flow.choose_side(Side::A).is_err());
        assert!(flow.choose_margin(1).is_err());
        assert!(flow.commit(&mut game).is_err());
        assert!(matches!(
            flow.select(&game, 3),
            Err(ScoreError::OutOfRange { index: 3, len: 3 })
        ));
        assert!(flow.state().is_idle());

        flow.select(&game, 0).unwrap();
        assert!(flow.select(&game, 1).is_err());
        assert!(flow.choose_margin(1).is_err());
        assert!(flow.commit(&mut game).is_err());
        assert_eq!(flow.state(), CorrectionState::Selecting { end_index: 0 });
    }

    #[test]
    fn cancel_discards_without_mutation() {
        let mut game = game();
        let mut flow = CorrectionFlow::new();
        flow.select(&game, 1).unwrap();
        flow.choose_side(Side::A).unwrap();
        flow.choose_margin(2).unwrap();
        flow.confirm().unwrap();
        flow.cancel();
        assert!(flow.state().is_idle());
        assert!(flow.commit(&mut game).is_err());
        assert_eq!(game.snapshot(), vec![5, -3, 0]);
        assert!(game.edit_log().is_empty());
    }

    #[test]
    fn cancel_from_early_states_returns_to_idle() {
        let game = game();
        let mut flow = CorrectionFlow::new();
        flow.select(&game, 2).unwrap();
        flow.cancel();
        assert!(flow.state().is_idle());
        assert_eq!(flow.before(), None);

        flow.select(&game, 0).unwrap();
        flow.choose_side(Side::B).unwrap();
        assert!(matches!(flow.state(), CorrectionState::ChoosingSide { .. }));
        flow.cancel();
        assert_eq!(flow, CorrectionFlow::new());
        assert_eq!(game.snapshot(), vec![5, -3, 0]);

        flow.select(&game, 1).unwrap();
        assert_eq!(flow.before(), Some(-3));
    }

    #[test]
    fn preview_reports_before_and_after() {
        let game = game();
        let mut flow = CorrectionFlow::new();
        assert_eq!(flow.preview(), None);
        flow.select(&game, 0).unwrap();
        let (before, after) = flow.preview().unwrap();
        assert_eq!(before.margin, 5);
        assert_eq!(after, None);
        flow.choose_side(Side::B).unwrap();
        flow.choose_margin(2).unwrap();
        let (_, after) = flow.preview().unwrap();
        assert_eq!(
            after,
            Some(EndOutcome {
                side: Side::B,
                margin: 2
            })
        );
    }
}
