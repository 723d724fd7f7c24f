//! Commander Runner: evaluation cycles over a universe of assets.
//!
//! This crate builds on `commander-core` to provide:
//! - Price table loading (wide CSV, forward fill, alias renaming)
//! - Universe and side tables (symbols, exchange aliases, margins)
//! - Deterministic synthetic price tables for development
//! - Parallel batch evaluation and ranked reports
//! - Export to JSON, CSV and a plain text summary
//! - Rebased series for anchor-relative comparison

pub mod export;
pub mod price_table;
pub mod rebase;
pub mod report;
pub mod runner;
pub mod synthetic;
pub mod universe;

pub use export::{
    export_indicators_csv, export_json, export_rebased_csv, export_table_csv, import_json,
    load_artifacts, render_text, save_artifacts,
};
pub use price_table::{LoadError, PriceTable};
pub use rebase::{rebase_symbols, RebasedSeries};
pub use report::{EvaluationReport, RankBy, RankedJudgment, ReportContext, SCHEMA_VERSION};
pub use runner::{evaluate_universe, run_cycle, top_clr_symbols, BatchOutcome, RunError};
pub use synthetic::{synthetic_table, trading_days};
pub use universe::Universe;
