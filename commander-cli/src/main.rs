//! Commander CLI: evaluation cycles, config inspection and rebased series.
//!
//! Commands:
//! - `evaluate`: score a universe from a price table and print both judgment tables
//! - `config`: print the effective engine configuration as TOML
//! - `rebase`: print prices relative to a CLR or CM anchor as CSV (default: top five by CLR)
//!
//! Logs go to stderr (`RUST_LOG`, default `info`); results go to stdout.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use commander_core::{EngineConfig, ScoringEngine};
use commander_runner::{
    export_json, export_rebased_csv, export_table_csv, rebase_symbols, render_text, run_cycle,
    save_artifacts, synthetic_table, top_clr_symbols, PriceTable, RankBy, Universe,
};

const DEFAULT_REBASE_COUNT: usize = 5;

#[derive(Parser)]
#[command(
    name = "commander",
    about = "Commander: CLR and CM allocation signals for an asset universe"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score every universe symbol and print the ranked judgment tables.
    Evaluate {
        /// Wide price CSV: `date,SYM1,SYM2,...`.
        #[arg(long, conflicts_with = "synthetic")]
        prices: Option<PathBuf>,

        /// Use deterministic synthetic prices instead of a file.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Universe TOML (symbols, aliases, margins). Defaults to the built-in list.
        #[arg(long)]
        universe: Option<PathBuf>,

        /// Engine config TOML. Missing fields keep their defaults.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Market valuation percentile in [0, 1].
        #[arg(long)]
        valuation: f64,

        /// CM table ordering: score or downside.
        #[arg(long, default_value = "score")]
        rank_by: String,

        /// Output format: text, json or csv.
        #[arg(long, default_value = "text")]
        format: String,

        /// Also save report.json and CSV tables under this directory.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the engine configuration as TOML.
    Config {
        /// Config TOML to validate and print instead of the defaults.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print prices rebased to a model's reference day as CSV (percent).
    Rebase {
        /// Wide price CSV: `date,SYM1,SYM2,...`.
        #[arg(long)]
        prices: PathBuf,

        /// Anchor: clr (one year back) or cm (one month back).
        #[arg(long, default_value = "clr")]
        anchor: String,

        /// Universe TOML for alias renaming. Defaults to the built-in list.
        #[arg(long)]
        universe: Option<PathBuf>,

        /// Engine config TOML for anchor and average lengths.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Symbols to rebase. Defaults to the five best CLR scores.
        symbols: Vec<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Evaluate {
            prices,
            synthetic,
            universe,
            config,
            valuation,
            rank_by,
            format,
            output,
        } => run_evaluate(
            prices, synthetic, universe, config, valuation, &rank_by, &format, output,
        ),
        Commands::Config { config } => run_config(config),
        Commands::Rebase {
            prices,
            anchor,
            universe,
            config,
            symbols,
        } => run_rebase(prices, &anchor, universe, config, symbols),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(&path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn load_universe(path: Option<PathBuf>) -> Result<Universe> {
    match path {
        Some(path) => Universe::load(&path)
            .with_context(|| format!("failed to load universe {}", path.display())),
        None => Ok(Universe::default()),
    }
}

fn load_prices(path: &Path, universe: &Universe) -> Result<PriceTable> {
    let mut table = PriceTable::load_csv(path)
        .with_context(|| format!("failed to load prices {}", path.display()))?;
    table.rename_aliases(&universe.aliases);
    Ok(table)
}

#[allow(clippy::too_many_arguments)]
fn run_evaluate(
    prices: Option<PathBuf>,
    synthetic: bool,
    universe_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    valuation: f64,
    rank_by: &str,
    format: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    if !(0.0..=1.0).contains(&valuation) {
        bail!("--valuation must be in [0, 1], got {valuation}");
    }
    let rank_by = match rank_by {
        "score" => RankBy::Score,
        "downside" => RankBy::Downside,
        _ => bail!("unknown --rank-by '{rank_by}'. Valid: score, downside"),
    };
    if !matches!(format, "text" | "json" | "csv") {
        bail!("unknown --format '{format}'. Valid: text, json, csv");
    }

    let engine = ScoringEngine::new(load_config(config_path)?)?;
    let universe = load_universe(universe_path)?;

    let table = match (prices, synthetic) {
        (Some(path), _) => load_prices(&path, &universe)?,
        (None, true) => {
            warn!("using synthetic prices, results are not market data");
            let end = chrono::Local::now().date_naive();
            let start = end - chrono::Duration::days(365 * 7);
            synthetic_table(&universe.symbols, start, end)?
        }
        (None, false) => bail!("one of --prices or --synthetic is required"),
    };

    let report = run_cycle(&engine, &table, &universe, valuation, rank_by, synthetic)?;

    match format {
        "json" => println!("{}", export_json(&report)?),
        "csv" => {
            print!("{}", export_table_csv(&report.clr)?);
            println!();
            print!("{}", export_table_csv(&report.cm)?);
        }
        _ => print!("{}", render_text(&report)),
    }

    if let Some(dir) = output {
        let run_dir = save_artifacts(&report, &dir)?;
        info!(path = %run_dir.display(), "artifacts saved");
    }

    Ok(())
}

fn run_config(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    print!("{}", config.to_toml_string()?);
    info!(fingerprint = %config.fingerprint(), "config is valid");
    Ok(())
}

fn run_rebase(
    prices: PathBuf,
    anchor: &str,
    universe_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    symbols: Vec<String>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let offset = match anchor {
        "clr" => config.anchors.clr.reference(),
        "cm" => config.anchors.cm.reference(),
        _ => bail!("unknown --anchor '{anchor}'. Valid: clr, cm"),
    };
    let universe = load_universe(universe_path)?;
    let table = load_prices(&prices, &universe)?;

    let symbols = if symbols.is_empty() {
        let engine = ScoringEngine::new(config.clone())?;
        let top = top_clr_symbols(&engine, &table, &universe, DEFAULT_REBASE_COUNT);
        info!(symbols = ?top, "no symbols given, rebasing the best CLR scores");
        top
    } else {
        symbols
    };

    let rebased = rebase_symbols(&table, &symbols, offset, config.trend.period);
    for symbol in &symbols {
        if !rebased.iter().any(|s| &s.symbol == symbol) {
            warn!(symbol = %symbol, offset, "no price at anchor, omitted");
        }
    }
    if rebased.is_empty() {
        bail!("none of the requested symbols could be rebased");
    }

    let dates: &[NaiveDate] = table.dates();
    print!("{}", export_rebased_csv(dates, &rebased)?);
    Ok(())
}
