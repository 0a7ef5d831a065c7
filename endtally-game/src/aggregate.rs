//! Totals and scorecard rows derived from the ledger.
//!
//! Nothing here is cached: every call walks the full score sequence so a
//! correction to any past end flows into every later running total.
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::side::{EndOutcome, Side};

/// Points accumulated by each side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Totals {
    pub side_a: u64,
    pub side_b: u64,
}

impl Totals {
    fn add(&mut self, value: i32) {
        let margin = u64::from(value.unsigned_abs());
        match value.cmp(&0) {
            Ordering::Greater => self.side_a += margin,
            Ordering::Less => self.side_b += margin,
            Ordering::Equal => {}
        }
    }

    /// Side currently ahead, or `None` when level.
    #[must_use]
    pub fn leader(&self) -> Option<Side> {
        match self.side_a.cmp(&self.side_b) {
            Ordering::Greater => Some(Side::A),
            Ordering::Less => Some(Side::B),
            Ordering::Equal => None,
        }
    }

    /// Size of the lead, zero when level.
    #[must_use]
    pub const fn lead(&self) -> u64 {
        self.side_a.abs_diff(self.side_b)
    }
}

/// One scorecard line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndRow {
    /// 1-based end number for display.
    pub end_number: usize,
    pub margin_a: u32,
    pub margin_b: u32,
    pub running_a: u64,
    pub running_b: u64,
}

impl EndRow {
    /// Side that took this end.
    #[must_use]
    pub const fn winner(&self) -> Side {
        if self.margin_a > 0 {
            Side::A
        } else if self.margin_b > 0 {
            Side::B
        } else {
            Side::Tie
        }
    }

    #[must_use]
    pub const fn totals(&self) -> Totals {
        Totals {
            side_a: self.running_a,
            side_b: self.running_b,
        }
    }
}

/// Main-screen summary: both totals and how many ends have been played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub ends: usize,
    pub totals: Totals,
    pub leader: Option<Side>,
}

/// Sum positive ends for side A and negative ends for side B; ties count for neither.
#[must_use]
pub fn compute_totals(scores: &[i32]) -> Totals {
    scores.iter().fold(Totals::default(), |mut totals, &value| {
        totals.add(value);
        totals
    })
}

/// Per-end rows with running totals; row `i` carries `compute_totals(&scores[..=i])`.
#[must_use]
pub fn compute_rows(scores: &[i32]) -> Vec<EndRow> {
    scores
        .iter()
        .enumerate()
        .scan(Totals::default(), |running, (index, &value)| {
            running.add(value);
            let outcome = EndOutcome::from_value(value);
            let (margin_a, margin_b) = match outcome.side {
                Side::A => (outcome.margin, 0),
                Side::B => (0, outcome.margin),
                Side::Tie => (0, 0),
            };
            Some(EndRow {
                end_number: index + 1,
                margin_a,
                margin_b,
                running_a: running.side_a,
                running_b: running.side_b,
            })
        })
        .collect()
}

#[must_use]
pub fn scoreboard(scores: &[i32]) -> Scoreboard {
    let totals = compute_totals(scores);
    Scoreboard {
        ends: scores.len(),
        totals,
        leader: totals.leader(),
    }
}
