//! A single match: identity, the end ledger and its correction history.
use serde::{Deserialize, Serialize};

use crate::aggregate::{EndRow, Scoreboard, Totals, compute_rows, compute_totals, scoreboard};
use crate::edit_log::{EditEntry, EditLog};
use crate::error::{ScoreError, ScoreResult};
use crate::ledger::EndLedger;
use crate::side::{EndOutcome, Side};

/// Full game state as persisted. Totals are never stored; they are derived
/// from the ledger on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GameRecord", into = "GameRecord")]
pub struct Game {
    id: String,
    created_at: i64,
    ledger: EndLedger,
    edit_log: EditLog,
}

impl Game {
    /// Empty game with an explicit identity.
    #[must_use]
    pub fn new(id: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: id.into(),
            created_at,
            ledger: EndLedger::new(),
            edit_log: EditLog::new(),
        }
    }

    /// Empty game with a fresh v4 UUID, stamped with the current time.
    #[must_use]
    pub fn create() -> Self {
        let game = Self::new(
            uuid::Uuid::new_v4().to_string(),
            chrono::Utc::now().timestamp_millis(),
        );
        log::info!("created game {}", game.id);
        game
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Creation time in epoch milliseconds.
    #[must_use]
    pub const fn created_at(&self) -> i64 {
        self.created_at
    }

    #[must_use]
    pub const fn ledger(&self) -> &EndLedger {
        &self.ledger
    }

    #[must_use]
    pub const fn edit_log(&self) -> &EditLog {
        &self.edit_log
    }

    /// Number of ends played.
    #[must_use]
    pub fn ends(&self) -> usize {
        self.ledger.len()
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<i32> {
        self.ledger.snapshot()
    }

    /// Record the next end.
    ///
    /// # Errors
    ///
    /// Propagates [`ScoreError::InvalidInput`] from the ledger.
    pub fn record_end(&mut self, margin: i32, winner: Side) -> ScoreResult<i32> {
        self.ledger.record_end(margin, winner)
    }

    /// Replace an end's value and log the correction.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::OutOfRange`] when `index` is not a recorded end;
    /// nothing is logged in that case.
    pub fn amend_end(&mut self, index: usize, new_value: i32) -> ScoreResult<EditEntry> {
        let previous = self.ledger.amend_end(index, new_value)?;
        Ok(self.edit_log.record(index, previous, new_value))
    }

    /// Decoded side and margin of a recorded end.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::OutOfRange`] when `index` is not a recorded end.
    pub fn outcome(&self, index: usize) -> ScoreResult<EndOutcome> {
        self.ledger.outcome(index)
    }

    #[must_use]
    pub fn totals(&self) -> Totals {
        compute_totals(self.ledger.as_slice())
    }

    #[must_use]
    pub fn rows(&self) -> Vec<EndRow> {
        compute_rows(self.ledger.as_slice())
    }

    #[must_use]
    pub fn scoreboard(&self) -> Scoreboard {
        scoreboard(self.ledger.as_slice())
    }

    /// Serialize to the persisted JSON layout.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse either the current layout or a record written by the legacy app.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the edit history points
    /// outside the recorded ends.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Wire shape of a persisted game.
///
/// Legacy saves name the fields `gameID`/`date` and keep corrections under
/// `logs` with 1-based end numbers; those are converted on load and never
/// written back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GameRecord {
    #[serde(alias = "gameID")]
    id: String,
    #[serde(alias = "date")]
    created_at: i64,
    #[serde(default)]
    scores: Vec<i32>,
    #[serde(default)]
    edit_log: Vec<EditEntry>,
    #[serde(default, skip_serializing)]
    logs: Option<Vec<(usize, i32, i32)>>,
}

impl From<Game> for GameRecord {
    fn from(game: Game) -> Self {
        Self {
            id: game.id,
            created_at: game.created_at,
            scores: game.ledger.snapshot(),
            edit_log: game.edit_log.entries().to_vec(),
            logs: None,
        }
    }
}

impl TryFrom<GameRecord> for Game {
    type Error = ScoreError;

    fn try_from(record: GameRecord) -> Result<Self, Self::Error> {
        let len = record.scores.len();
        let mut entries = record.edit_log;
        if let Some(legacy) = record.logs {
            log::warn!(
                "upgrading {} legacy log entries for game {}",
                legacy.len(),
                record.id
            );
            for (end_number, old_value, new_value) in legacy {
                if end_number == 0 || end_number > len {
                    return Err(ScoreError::invalid(format!(
                        "legacy log references end {end_number} but only {len} ends exist"
                    )));
                }
                entries.push(EditEntry {
                    end_index: end_number - 1,
                    old_value,
                    new_value,
                });
            }
        }
        if let Some(bad) = entries.iter().find(|entry| entry.end_index >= len) {
            return Err(ScoreError::OutOfRange {
                index: bad.end_index,
                len,
            });
        }
        Ok(Self {
            id: record.id,
            created_at: record.created_at,
            ledger: EndLedger::from_scores(record.scores),
            edit_log: EditLog::from_entries(entries),
        })
    }
}
