//! Sides of the match and the signed encoding of a single end.
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{ScoreError, ScoreResult};

/// Which side took an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Side A, stored as a positive value.
    #[serde(alias = "home")]
    A,
    /// Side B, stored as a negative value.
    #[serde(alias = "away")]
    B,
    /// Neither side scored; stored as exactly zero.
    Tie,
}

impl Side {
    #[must_use]
    pub const fn is_tie(self) -> bool {
        matches!(self, Self::Tie)
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::A => write!(f, "a"),
            Side::B => write!(f, "b"),
            Side::Tie => write!(f, "tie"),
        }
    }
}

impl FromStr for Side {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "home" => Ok(Self::A),
            "b" | "away" => Ok(Self::B),
            "tie" | "t" => Ok(Self::Tie),
            other => Err(ScoreError::invalid(format!(
                "unknown side {other:?} (expected a, b or tie)"
            ))),
        }
    }
}

/// A decoded end: who took it and by how much.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EndOutcome {
    pub side: Side,
    pub margin: u32,
}

impl EndOutcome {
    /// Decode a stored ledger value.
    #[must_use]
    pub const fn from_value(value: i32) -> Self {
        let side = if value > 0 {
            Side::A
        } else if value < 0 {
            Side::B
        } else {
            Side::Tie
        };
        Self {
            side,
            margin: value.unsigned_abs(),
        }
    }

    /// Encode back into the signed ledger representation.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::InvalidInput`] for a tie with a nonzero margin or a
    /// margin that does not fit the ledger's integer range.
    pub fn value(self) -> ScoreResult<i32> {
        signed_value(self.side, self.margin)
    }
}

/// Sign a margin magnitude for the given side.
///
/// # Errors
///
/// Returns [`ScoreError::InvalidInput`] for a tie with a nonzero margin or a
/// margin too large for the ledger.
pub fn signed_value(side: Side, margin: u32) -> ScoreResult<i32> {
    let signed = match side {
        Side::A => i64::from(margin),
        Side::B => -i64::from(margin),
        Side::Tie if margin == 0 => 0,
        Side::Tie => {
            return Err(ScoreError::invalid(format!(
                "a tied end cannot carry a margin (got {margin})"
            )));
        }
    };
    i32::try_from(signed)
        .map_err(|_| ScoreError::invalid(format!("margin {margin} exceeds the ledger range")))
}

/// Parse a margin typed by the user.
///
/// Only whole numbers are accepted; the sign is left for the ledger to judge
/// so a negative margin surfaces the same error however it arrives.
///
/// # Errors
///
/// Returns [`ScoreError::InvalidInput`] for empty, fractional or non-numeric text.
pub fn parse_margin(text: &str) -> ScoreResult<i32> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ScoreError::invalid("margin is empty"));
    }
    if let Ok(value) = trimmed.parse::<i32>() {
        return Ok(value);
    }
    if trimmed.parse::<f64>().is_ok_and(f64::is_finite) {
        return Err(ScoreError::invalid(format!(
            "margin must be a whole number (got {trimmed})"
        )));
    }
    Err(ScoreError::invalid(format!(
        "margin {trimmed:?} is not a number"
    )))
}
