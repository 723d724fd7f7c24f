//! Evaluation cycle: wires the price table, universe and engine together.
//!
//! Two entry points:
//! - `evaluate_universe()`: scores every listed symbol in parallel, no ranking.
//! - `run_cycle()`: validates inputs, evaluates, and builds the ranked report.
//!
//! Per-asset pipelines share nothing mutable. Results come back in universe
//! order regardless of scheduling.

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use commander_core::engine::ConfigError;
use commander_core::domain::Model;
use commander_core::{AssetEvaluation, ScoringEngine};

use crate::price_table::{LoadError, PriceTable};
use crate::report::{rank_table, EvaluationReport, RankBy, ReportContext};
use crate::universe::Universe;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error("valuation percentile {0} is outside [0, 1]")]
    InvalidValuation(f64),
    #[error("none of the {0} universe symbols are in the price table")]
    NothingToEvaluate(usize),
}

/// Evaluations in universe order plus the symbols that had no data.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub evaluations: Vec<AssetEvaluation>,
    pub skipped: Vec<String>,
}

/// Score every universe symbol present in `table`.
///
/// Symbols with no column, or a column without a single price, are skipped
/// and produce no record.
pub fn evaluate_universe(
    engine: &ScoringEngine,
    table: &PriceTable,
    universe: &Universe,
) -> BatchOutcome {
    let results: Vec<Result<AssetEvaluation, String>> = universe
        .symbols
        .par_iter()
        .map(|symbol| {
            let Some(series) = table.series(symbol) else {
                return Err(symbol.clone());
            };
            let eval = engine.evaluate(symbol, &series, universe.margin(symbol));
            for fallback in &eval.fallbacks {
                debug!(symbol = %symbol, ?fallback, "component fell back to neutral value");
            }
            Ok(eval)
        })
        .collect();

    let mut evaluations = Vec::with_capacity(results.len());
    let mut skipped = Vec::new();
    for result in results {
        match result {
            Ok(eval) => evaluations.push(eval),
            Err(symbol) => {
                warn!(symbol = %symbol, "no prices for symbol, skipping");
                skipped.push(symbol);
            }
        }
    }

    BatchOutcome {
        evaluations,
        skipped,
    }
}

/// Run one full evaluation cycle and build its report.
pub fn run_cycle(
    engine: &ScoringEngine,
    table: &PriceTable,
    universe: &Universe,
    valuation: f64,
    rank_by: RankBy,
    has_synthetic: bool,
) -> Result<EvaluationReport, RunError> {
    if !(0.0..=1.0).contains(&valuation) {
        return Err(RunError::InvalidValuation(valuation));
    }
    universe.validate()?;

    info!(
        symbols = universe.len(),
        days = table.len(),
        as_of = ?table.last_date(),
        "starting evaluation cycle"
    );

    let outcome = evaluate_universe(engine, table, universe);
    if outcome.evaluations.is_empty() {
        return Err(RunError::NothingToEvaluate(universe.len()));
    }

    let regime = engine.regime(valuation);
    let context = ReportContext {
        as_of: table.last_date(),
        valuation,
        regime,
        rank_by,
        reduce_fraction: engine.config().judgment.reduce_fraction,
        config_fingerprint: engine.config().fingerprint(),
        dataset_hash: table.dataset_hash(),
        has_synthetic,
    };
    let report = EvaluationReport::build(context, outcome.evaluations, outcome.skipped);

    let degraded = report.evaluations.iter().filter(|e| e.is_degraded()).count();
    info!(
        evaluated = report.evaluations.len(),
        skipped = report.skipped.len(),
        degraded,
        regime = %regime.active,
        "evaluation cycle complete"
    );

    Ok(report)
}

/// The `count` highest-scoring CLR symbols of the universe, best first.
///
/// Default selection for rebased comparison charts.
pub fn top_clr_symbols(
    engine: &ScoringEngine,
    table: &PriceTable,
    universe: &Universe,
    count: usize,
) -> Vec<String> {
    let outcome = evaluate_universe(engine, table, universe);
    rank_table(
        &outcome.evaluations,
        Model::Clr,
        RankBy::Score,
        engine.config().judgment.reduce_fraction,
    )
    .into_iter()
    .take(count)
    .map(|row| row.symbol)
    .collect()
}
