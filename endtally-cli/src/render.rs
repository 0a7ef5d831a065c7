use anyhow::Result;
use colored::Colorize;
use endtally_game::{EditEntry, EndOutcome, EndRow, Game, Scoreboard, Side};
use serde::Serialize;
use std::io::Write;

use crate::config::ScorecardConfig;

#[derive(Debug, Serialize)]
struct ScoreboardView<'a> {
    id: &'a str,
    ends: usize,
    side_a: SideView<'a>,
    side_b: SideView<'a>,
    leader: Option<Side>,
}

#[derive(Debug, Serialize)]
struct SideView<'a> {
    label: &'a str,
    total: u64,
}

#[derive(Debug, Serialize)]
struct AmendView<'a> {
    correction: LogLine,
    scoreboard: ScoreboardView<'a>,
}

#[derive(Debug, Serialize)]
struct LogLine {
    end_number: usize,
    old_value: i32,
    new_value: i32,
}

impl From<&EditEntry> for LogLine {
    fn from(entry: &EditEntry) -> Self {
        Self {
            end_number: entry.end_index + 1,
            old_value: entry.old_value,
            new_value: entry.new_value,
        }
    }
}

/// "Home 5", "Away 3" or "Tie".
pub fn describe_value(cfg: &ScorecardConfig, value: i32) -> String {
    let outcome = EndOutcome::from_value(value);
    match outcome.side {
        Side::Tie => cfg.label(Side::Tie).to_string(),
        side => format!("{} {}", cfg.label(side), outcome.margin),
    }
}

fn scoreboard_view<'a>(
    cfg: &'a ScorecardConfig,
    game: &'a Game,
    board: &Scoreboard,
) -> ScoreboardView<'a> {
    ScoreboardView {
        id: game.id(),
        ends: board.ends,
        side_a: SideView {
            label: cfg.label(Side::A),
            total: board.totals.side_a,
        },
        side_b: SideView {
            label: cfg.label(Side::B),
            total: board.totals.side_b,
        },
        leader: board.leader,
    }
}

/// A committed correction followed by the updated scoreboard. With `json`
/// both go out as one object.
pub fn write_amend(
    out: &mut dyn Write,
    cfg: &ScorecardConfig,
    game: &Game,
    entry: &EditEntry,
    json: bool,
) -> Result<()> {
    if json {
        let view = AmendView {
            correction: LogLine::from(entry),
            scoreboard: scoreboard_view(cfg, game, &game.scoreboard()),
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&view)?)?;
        return Ok(());
    }

    writeln!(
        out,
        "End {}: {} -> {}",
        entry.end_index + 1,
        describe_value(cfg, entry.old_value),
        describe_value(cfg, entry.new_value)
    )?;
    write_scoreboard(out, cfg, game, false)
}

pub fn write_scoreboard(
    out: &mut dyn Write,
    cfg: &ScorecardConfig,
    game: &Game,
    json: bool,
) -> Result<()> {
    let board: Scoreboard = game.scoreboard();
    if json {
        let view = scoreboard_view(cfg, game, &board);
        writeln!(out, "{}", serde_json::to_string_pretty(&view)?)?;
        return Ok(());
    }

    writeln!(
        out,
        "{} {}  -  {} {}",
        cfg.label(Side::A).bright_cyan().bold(),
        board.totals.side_a,
        board.totals.side_b,
        cfg.label(Side::B).bright_yellow().bold()
    )?;
    let standing = match board.leader {
        Some(side) => format!("{} leads by {}", cfg.label(side), board.totals.lead()),
        None => "Level".to_string(),
    };
    writeln!(out, "Ends played: {}  ·  {standing}", board.ends)?;
    Ok(())
}

pub fn write_card(
    out: &mut dyn Write,
    cfg: &ScorecardConfig,
    rows: &[EndRow],
    json: bool,
) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(rows)?)?;
        return Ok(());
    }

    let a = cfg.label(Side::A);
    let b = cfg.label(Side::B);
    let width_a = a.chars().count().max(5);
    let width_b = b.chars().count().max(5);
    writeln!(
        out,
        "{:>3} | {a:>width_a$} | {:>5} | {b:>width_b$} | {:>5}",
        "End", "Total", "Total"
    )?;
    writeln!(out, "{}", "-".repeat(width_a + width_b + 25))?;
    if rows.is_empty() {
        writeln!(out, "No ends recorded.")?;
        return Ok(());
    }
    for row in rows {
        writeln!(
            out,
            "{:>3} | {:>width_a$} | {:>5} | {:>width_b$} | {:>5}",
            row.end_number, row.margin_a, row.running_a, row.margin_b, row.running_b
        )?;
    }
    Ok(())
}

pub fn write_log(
    out: &mut dyn Write,
    cfg: &ScorecardConfig,
    entries: &[EditEntry],
    json: bool,
) -> Result<()> {
    if json {
        let lines: Vec<LogLine> = entries.iter().map(LogLine::from).collect();
        writeln!(out, "{}", serde_json::to_string_pretty(&lines)?)?;
        return Ok(());
    }

    if entries.is_empty() {
        writeln!(out, "No corrections recorded.")?;
        return Ok(());
    }
    for (position, entry) in entries.iter().enumerate() {
        writeln!(
            out,
            "#{} End {}: {} -> {}",
            position + 1,
            entry.end_index + 1,
            describe_value(cfg, entry.old_value).dimmed(),
            describe_value(cfg, entry.new_value).green()
        )?;
    }
    Ok(())
}
