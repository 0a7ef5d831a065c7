mod config;
mod file_storage;
mod render;
mod simulate;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use endtally_game::{MAX_END_MARGIN, ScoreEngine, Side, parse_margin};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;

use config::ScorecardConfig;
use file_storage::JsonFileStorage;

#[derive(Debug, Parser)]
#[command(name = "endtally", version)]
#[command(about = "End-by-end scorekeeper with a correction history")]
struct Args {
    /// JSON config file (labels, save key, data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding saved games; overrides the config file
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Save key of the game to operate on; overrides the config file
    #[arg(long, global = true)]
    key: Option<String>,

    /// Machine-readable output for show, card and log
    #[arg(long, global = true)]
    json: bool,

    /// Optional path to write output to instead of stdout
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Discard the saved game and start a new one
    New,
    /// Record the next end
    Record {
        /// Winner of the end: a, b or tie (home/away also accepted)
        side: Side,
        /// Points scored; omit for a tie
        #[arg(allow_negative_numbers = true)]
        margin: Option<String>,
    },
    /// Correct a recorded end
    Amend {
        /// End number as shown on the card (1-based)
        end: usize,
        /// New winner: a, b or tie
        side: Side,
        /// New margin; omit for a tie
        #[arg(allow_negative_numbers = true)]
        margin: Option<String>,
    },
    /// Show both totals and the number of ends played
    Show,
    /// Print the per-end scorecard with running totals
    Card,
    /// Print the correction history
    Log,
    /// Print the saved game record
    Export,
    /// Start a new game filled with seeded random ends
    Simulate {
        #[arg(long, default_value_t = 1337)]
        seed: u64,
        #[arg(long, default_value_t = 8)]
        ends: usize,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let mut output_target = OutputTarget::new(args.output.clone())?;
    run(&args, output_target.writer())?;
    output_target.flush_inner()?;
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn resolve_config(args: &Args) -> Result<ScorecardConfig> {
    let mut cfg = ScorecardConfig::load(args.config.as_deref()).context("loading config")?;
    if let Some(dir) = &args.data_dir {
        cfg.data_dir.clone_from(dir);
    }
    if let Some(key) = &args.key {
        cfg.save_key.clone_from(key);
    }
    cfg.validate().context("invalid config")?;
    Ok(cfg)
}

fn run(args: &Args, out: &mut dyn Write) -> Result<()> {
    let cfg = resolve_config(args)?;
    let engine = ScoreEngine::new(JsonFileStorage::new(cfg.data_dir.clone()));
    let key = cfg.save_key.as_str();

    match &args.command {
        Command::New => {
            let game = engine.reset(key)?;
            engine.save(key, &game)?;
            writeln!(out, "{} {}", "New game".green().bold(), game.id())?;
        }
        Command::Record { side, margin } => {
            let mut session = engine.open_session(key)?;
            let margin = margin_or_tie(*side, margin.as_deref())?;
            if margin.unsigned_abs() > MAX_END_MARGIN {
                log::warn!("margin {margin} is more than one end can score ({MAX_END_MARGIN})");
            }
            session.record_end(margin, *side)?;
            let game = session.into_game();
            engine.save(key, &game)?;
            render::write_scoreboard(out, &cfg, &game, args.json)?;
        }
        Command::Amend { end, side, margin } => {
            let Some(end_index) = end.checked_sub(1) else {
                bail!("end numbers start at 1");
            };
            let mut session = engine.open_session(key)?;
            let margin = margin_or_tie(*side, margin.as_deref())?;
            let margin = u32::try_from(margin)
                .with_context(|| format!("margin must be non-negative (got {margin})"))?;
            let entry = session.correct_end(end_index, *side, margin)?;
            let game = session.into_game();
            engine.save(key, &game)?;
            render::write_amend(out, &cfg, &game, &entry, args.json)?;
        }
        Command::Show => {
            let game = engine.load_or_create(key)?;
            render::write_scoreboard(out, &cfg, &game, args.json)?;
        }
        Command::Card => {
            let game = engine.load_or_create(key)?;
            render::write_card(out, &cfg, &game.rows(), args.json)?;
        }
        Command::Log => {
            let game = engine.load_or_create(key)?;
            render::write_log(out, &cfg, game.edit_log().entries(), args.json)?;
        }
        Command::Export => {
            let game = engine.load(key)?;
            writeln!(out, "{}", serde_json::to_string_pretty(&game)?)?;
        }
        Command::Simulate { seed, ends } => {
            let mut game = engine.reset(key)?;
            simulate::fill_random_ends(&mut game, *seed, *ends)?;
            engine.save(key, &game)?;
            render::write_card(out, &cfg, &game.rows(), args.json)?;
        }
    }
    Ok(())
}

/// Margin text for an end; a tie may omit it.
fn margin_or_tie(side: Side, margin: Option<&str>) -> Result<i32> {
    match (side, margin) {
        (_, Some(text)) => Ok(parse_margin(text)?),
        (Side::Tie, None) => Ok(0),
        (side, None) => bail!("a margin is required when side {side} takes the end"),
    }
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}
