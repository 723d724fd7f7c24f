//! Evaluation report: both judgment tables for one cycle, ranked.
//!
//! The report is the persisted artifact of a cycle. It carries everything
//! needed to reproduce it: the engine config fingerprint, the dataset hash
//! and the valuation percentile the regime was derived from.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use commander_core::components::RegimeState;
use commander_core::domain::{EnergyState, Model, TrendPosition, Verdict};
use commander_core::AssetEvaluation;

/// Current schema version for persisted reports.
pub const SCHEMA_VERSION: u32 = 1;

/// Ordering of the CM table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankBy {
    /// Composite score, highest first.
    #[default]
    Score,
    /// Net return over downside deviation, highest first.
    Downside,
}

/// One line of a judgment table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedJudgment {
    /// 1-based position in the table.
    pub rank: usize,
    pub symbol: String,
    pub verdict: Verdict,
    pub score: f64,
    /// The value the table is sorted by.
    pub sort_key: f64,
    pub allocation: f64,
    pub energy: EnergyState,
    pub trend: TrendPosition,
    pub degraded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// Date of the last row of the price table.
    pub as_of: Option<NaiveDate>,
    pub valuation: f64,
    pub regime: RegimeState,
    pub rank_by: RankBy,
    pub clr: Vec<RankedJudgment>,
    pub cm: Vec<RankedJudgment>,
    /// Full per-asset indicators, in universe order.
    pub evaluations: Vec<AssetEvaluation>,
    /// Universe members absent from the price table.
    pub skipped: Vec<String>,
    pub config_fingerprint: String,
    pub dataset_hash: String,
    pub has_synthetic: bool,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Everything a report is built from besides the evaluations.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub as_of: Option<NaiveDate>,
    pub valuation: f64,
    pub regime: RegimeState,
    pub rank_by: RankBy,
    pub reduce_fraction: f64,
    pub config_fingerprint: String,
    pub dataset_hash: String,
    pub has_synthetic: bool,
}

impl EvaluationReport {
    pub fn build(
        context: ReportContext,
        evaluations: Vec<AssetEvaluation>,
        skipped: Vec<String>,
    ) -> Self {
        let clr = rank_table(&evaluations, Model::Clr, RankBy::Score, context.reduce_fraction);
        let cm = rank_table(&evaluations, Model::Cm, context.rank_by, context.reduce_fraction);

        Self {
            schema_version: SCHEMA_VERSION,
            as_of: context.as_of,
            valuation: context.valuation,
            regime: context.regime,
            rank_by: context.rank_by,
            clr,
            cm,
            evaluations,
            skipped,
            config_fingerprint: context.config_fingerprint,
            dataset_hash: context.dataset_hash,
            has_synthetic: context.has_synthetic,
        }
    }

    pub fn table(&self, model: Model) -> &[RankedJudgment] {
        match model {
            Model::Clr => &self.clr,
            Model::Cm => &self.cm,
        }
    }

    /// The table the current regime favours.
    pub fn recommended(&self) -> &[RankedJudgment] {
        self.table(self.regime.active)
    }

    pub fn evaluation(&self, symbol: &str) -> Option<&AssetEvaluation> {
        self.evaluations.iter().find(|e| e.symbol == symbol)
    }
}

/// Sort one model's judgments descending, ties broken by symbol.
pub fn rank_table(
    evaluations: &[AssetEvaluation],
    model: Model,
    rank_by: RankBy,
    reduce_fraction: f64,
) -> Vec<RankedJudgment> {
    let mut rows: Vec<RankedJudgment> = evaluations
        .iter()
        .map(|e| {
            let judgment = e.judgment(model);
            let sort_key = match (model, rank_by) {
                (Model::Cm, RankBy::Downside) => e.indicators.cm_normalized,
                _ => judgment.score,
            };
            RankedJudgment {
                rank: 0,
                symbol: e.symbol.clone(),
                verdict: judgment.verdict,
                score: judgment.score,
                sort_key,
                allocation: judgment.verdict.allocation(reduce_fraction),
                energy: e.indicators.energy.state,
                trend: e.indicators.trend.position,
                degraded: e.is_degraded(),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.sort_key
            .total_cmp(&a.sort_key)
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i + 1;
    }
    rows
}
