//! The end ledger: one signed value per end, in play order.
use serde::{Deserialize, Serialize};

use crate::error::{ScoreError, ScoreResult};
use crate::side::{EndOutcome, Side, signed_value};

/// Ordered per-end scores. Positive values belong to side A, negative values
/// to side B, and zero is a tie.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndLedger {
    scores: Vec<i32>,
}

impl EndLedger {
    #[must_use]
    pub const fn new() -> Self {
        Self { scores: Vec::new() }
    }

    /// Rebuild a ledger from persisted values.
    #[must_use]
    pub const fn from_scores(scores: Vec<i32>) -> Self {
        Self { scores }
    }

    /// Append the next end and return the stored signed value.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::InvalidInput`] when `margin` is negative or a tie
    /// is recorded with a nonzero margin.
    pub fn record_end(&mut self, margin: i32, winner: Side) -> ScoreResult<i32> {
        if margin < 0 {
            return Err(ScoreError::invalid(format!(
                "margin must be non-negative (got {margin})"
            )));
        }
        let value = signed_value(winner, margin.unsigned_abs())?;
        self.scores.push(value);
        log::debug!(
            "recorded end {} as {value} ({winner} by {margin})",
            self.scores.len()
        );
        Ok(value)
    }

    /// Replace the value of an existing end, returning the previous value.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::OutOfRange`] when `index` is not a recorded end.
    pub fn amend_end(&mut self, index: usize, new_value: i32) -> ScoreResult<i32> {
        let len = self.scores.len();
        let slot = self
            .scores
            .get_mut(index)
            .ok_or(ScoreError::OutOfRange { index, len })?;
        let previous = std::mem::replace(slot, new_value);
        log::debug!("amended end index {index}: {previous} -> {new_value}");
        Ok(previous)
    }

    /// Number of ends played so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Owned copy of the current scores.
    #[must_use]
    pub fn snapshot(&self) -> Vec<i32> {
        self.scores.clone()
    }

    /// Borrow the scores without copying.
    #[must_use]
    pub fn as_slice(&self) -> &[i32] {
        &self.scores
    }

    /// Stored value of one end.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::OutOfRange`] when `index` is not a recorded end.
    pub fn value_at(&self, index: usize) -> ScoreResult<i32> {
        self.scores
            .get(index)
            .copied()
            .ok_or(ScoreError::OutOfRange {
                index,
                len: self.scores.len(),
            })
    }

    /// Decoded side and margin of one end.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::OutOfRange`] when `index` is not a recorded end.
    pub fn outcome(&self, index: usize) -> ScoreResult<EndOutcome> {
        self.value_at(index).map(EndOutcome::from_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_ledger() -> EndLedger {
        let mut ledger = EndLedger::new();
        ledger.record_end(5, Side::A).unwrap();
        ledger.record_end(3, Side::B).unwrap();
        ledger.record_end(0, Side::Tie).unwrap();
        ledger
    }

    #[test]
    fn record_end_signs_by_winner() {
        let ledger = scenario_ledger();
        assert_eq!(ledger.snapshot(), vec![5, -3, 0]);
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn record_end_rejects_bad_input_without_mutating() {
        let mut ledger = scenario_ledger();
        assert!(matches!(
            ledger.record_end(-2, Side::A),
            Err(ScoreError::InvalidInput(_))
        ));
        assert!(matches!(
            ledger.record_end(4, Side::Tie),
            Err(ScoreError::InvalidInput(_))
        ));
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn record_end_allows_zero_margin_for_a_side() {
        let mut ledger = EndLedger::new();
        assert_eq!(ledger.record_end(0, Side::B), Ok(0));
        assert_eq!(ledger.snapshot(), vec![0]);
    }

    #[test]
    fn amend_end_returns_previous_value() {
        let mut ledger = scenario_ledger();
        assert_eq!(ledger.amend_end(1, -7), Ok(-3));
        assert_eq!(ledger.snapshot(), vec![5, -7, 0]);
        assert_eq!(
            ledger.amend_end(5, 1),
            Err(ScoreError::OutOfRange { index: 5, len: 3 })
        );
        assert_eq!(
            ledger.amend_end(3, 1),
            Err(ScoreError::OutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn snapshot_is_detached_from_the_ledger() {
        let ledger = scenario_ledger();
        let mut copy = ledger.snapshot();
        copy[0] = 99;
        assert_eq!(ledger.as_slice()[0], 5);
    }

    #[test]
    fn outcome_reads_back_side_and_margin() {
        let ledger = scenario_ledger();
        assert_eq!(ledger.outcome(1).unwrap().side, Side::B);
        assert_eq!(ledger.outcome(1).unwrap().margin, 3);
        assert!(ledger.outcome(3).is_err());
    }

    #[test]
    fn serializes_as_plain_array() {
        let ledger = scenario_ledger();
        assert_eq!(serde_json::to_string(&ledger).unwrap(), "[5,-3,0]");
    }
}
