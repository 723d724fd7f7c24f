//! Reporting and export: JSON, CSV, and plain text.
//!
//! - **JSON**: full round-trip serialization of `EvaluationReport` with schema versioning
//! - **CSV**: one file per judgment table, the indicator sheet, and rebased series
//! - **Text**: the terminal summary printed by `commander evaluate`
//!
//! Persisted reports carry a `schema_version`; newer versions are rejected on load.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;

use commander_core::domain::Model;
use commander_core::AssetEvaluation;

use crate::rebase::RebasedSeries;
use crate::report::{EvaluationReport, RankedJudgment, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

pub fn export_json(report: &EvaluationReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize EvaluationReport to JSON")
}

/// Deserialize a report, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<EvaluationReport> {
    let report: EvaluationReport =
        serde_json::from_str(json).context("failed to deserialize EvaluationReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Columns: rank, symbol, verdict, score, sort_key, allocation, energy, trend, degraded
pub fn export_table_csv(rows: &[RankedJudgment]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "rank",
        "symbol",
        "verdict",
        "score",
        "sort_key",
        "allocation",
        "energy",
        "trend",
        "degraded",
    ])?;
    for r in rows {
        wtr.write_record([
            &r.rank.to_string(),
            &r.symbol,
            &r.verdict.to_string(),
            &format!("{:.6}", r.score),
            &format!("{:.6}", r.sort_key),
            &format!("{:.2}", r.allocation),
            &r.energy.to_string(),
            &r.trend.to_string(),
            &r.degraded.to_string(),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// One row per asset with every raw component.
pub fn export_indicators_csv(evaluations: &[AssetEvaluation]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "symbol",
        "last_price",
        "margin",
        "clr_value",
        "cm_value",
        "sigma",
        "volatility_drag",
        "downside_deviation",
        "tsi",
        "signal",
        "energy",
        "trend_average",
        "trend",
        "composite_clr",
        "composite_cm",
        "cm_normalized",
        "fallbacks",
    ])?;
    for e in evaluations {
        let i = &e.indicators;
        let fallbacks: Vec<String> = e
            .fallbacks
            .iter()
            .map(|f| format!("{f:?}"))
            .collect();
        wtr.write_record([
            &e.symbol,
            &optional(i.last_price),
            &format!("{:.4}", e.margin),
            &format!("{:.6}", i.clr_value),
            &format!("{:.6}", i.cm_value),
            &format!("{:.6}", i.sigma),
            &format!("{:.6}", i.volatility_drag),
            &format!("{:.6}", i.downside_deviation),
            &optional(i.energy.tsi),
            &optional(i.energy.signal),
            &i.energy.state.to_string(),
            &optional(i.trend.average),
            &i.trend.position.to_string(),
            &format!("{:.6}", i.composite_clr),
            &format!("{:.6}", i.composite_cm),
            &format!("{:.6}", i.cm_normalized),
            &fallbacks.join("; "),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Columns: date, then `SYM` and `SYM_avg` per series. Values in percent; blanks where undefined.
pub fn export_rebased_csv(dates: &[NaiveDate], series: &[RebasedSeries]) -> Result<String> {
    for s in series {
        if s.values.len() != dates.len() || s.average.len() != dates.len() {
            bail!(
                "rebased series '{}' has {} values for {} dates",
                s.symbol,
                s.values.len(),
                dates.len()
            );
        }
    }

    let mut wtr = csv::Writer::from_writer(vec![]);
    let mut header = vec!["date".to_string()];
    for s in series {
        header.push(s.symbol.clone());
        header.push(format!("{}_avg", s.symbol));
    }
    wtr.write_record(&header)?;

    for (row, date) in dates.iter().enumerate() {
        let mut record = vec![date.to_string()];
        for s in series {
            record.push(percent(s.values[row]));
            record.push(percent(s.average[row]));
        }
        wtr.write_record(&record)?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.6}")).unwrap_or_default()
}

fn percent(value: f64) -> String {
    if value.is_finite() {
        format!("{:.4}", value * 100.0)
    } else {
        String::new()
    }
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for one cycle.
///
/// Creates `cycle_{as_of}_{timestamp}/` under `output_dir` containing:
/// - `report.json`: the full `EvaluationReport`
/// - `clr.csv`, `cm.csv`: the ranked judgment tables
/// - `indicators.csv`: raw components per asset
///
/// Returns the path to the created directory.
pub fn save_artifacts(report: &EvaluationReport, output_dir: &Path) -> Result<PathBuf> {
    let as_of = report
        .as_of
        .map(|d| d.format("%Y%m%d").to_string())
        .unwrap_or_else(|| "undated".into());
    let dirname = format!(
        "cycle_{as_of}_{}",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    std::fs::write(run_dir.join("report.json"), export_json(report)?)?;
    std::fs::write(run_dir.join("clr.csv"), export_table_csv(&report.clr)?)?;
    std::fs::write(run_dir.join("cm.csv"), export_table_csv(&report.cm)?)?;
    std::fs::write(
        run_dir.join("indicators.csv"),
        export_indicators_csv(&report.evaluations)?,
    )?;

    Ok(run_dir)
}

/// Load a report from an artifact directory's report.json.
pub fn load_artifacts(dir: &Path) -> Result<EvaluationReport> {
    let path = dir.join("report.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}

// ─── Text summary ───────────────────────────────────────────────────

/// Both judgment tables, one after the other, the recommended one marked.
pub fn render_text(report: &EvaluationReport) -> String {
    let mut out = String::with_capacity(4096);

    let as_of = report
        .as_of
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".into());
    let _ = writeln!(out, "As of {as_of}  valuation {:.2}", report.valuation);
    if report.has_synthetic {
        let _ = writeln!(out, "DATA: SYNTHETIC");
    }

    for model in [Model::Clr, Model::Cm] {
        let marker = if report.regime.recommends(model) {
            "  <- recommended"
        } else {
            ""
        };
        let _ = writeln!(out);
        let _ = writeln!(out, "{model}{marker}");
        let _ = writeln!(
            out,
            "{:>4}  {:<8} {:<7} {:>9} {:>6} {:<5} {:<5}",
            "#", "symbol", "verdict", "score", "alloc", "nrg", "trend"
        );
        for r in report.table(model) {
            let flag = if r.degraded { " *" } else { "" };
            let _ = writeln!(
                out,
                "{:>4}  {:<8} {:<7} {:>8.2}% {:>5.0}% {:<5} {:<5}{flag}",
                r.rank,
                r.symbol,
                r.verdict.to_string(),
                r.score * 100.0,
                r.allocation * 100.0,
                r.energy.to_string(),
                r.trend.to_string(),
            );
        }
    }

    if report.evaluations.iter().any(|e| e.is_degraded()) {
        let _ = writeln!(out);
        let _ = writeln!(out, "* short history: some components read as neutral");
    }
    if !report.skipped.is_empty() {
        let _ = writeln!(out, "skipped (no prices): {}", report.skipped.join(", "));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{RankBy, ReportContext};
    use commander_core::domain::PriceSeries;
    use commander_core::{EngineConfig, ScoringEngine};

    fn sample_report() -> EvaluationReport {
        let engine = ScoringEngine::new(EngineConfig::default()).unwrap();
        let rising: Vec<f64> = (0..1300).map(|i| 100.0 * 1.0004_f64.powi(i)).collect();
        let evaluations = vec![
            engine.evaluate("RISE", &PriceSeries::new(rising), 0.1),
            engine.evaluate("FLAT", &PriceSeries::new(vec![50.0; 1300]), 0.0),
        ];
        let context = ReportContext {
            as_of: NaiveDate::from_ymd_opt(2024, 6, 28),
            valuation: 0.4,
            regime: engine.regime(0.4),
            rank_by: RankBy::Score,
            reduce_fraction: 0.5,
            config_fingerprint: engine.config().fingerprint(),
            dataset_hash: "deadbeef".into(),
            has_synthetic: false,
        };
        EvaluationReport::build(context, evaluations, vec!["VWO".into()])
    }

    #[test]
    fn json_round_trip() {
        let report = sample_report();
        let json = export_json(&report).unwrap();
        let back = import_json(&json).unwrap();
        assert_eq!(back.schema_version, SCHEMA_VERSION);
        assert_eq!(back.skipped, report.skipped);
        assert_eq!(back.config_fingerprint, report.config_fingerprint);
        assert_eq!(back.clr.len(), 2);
        assert_eq!(back.clr[0].symbol, report.clr[0].symbol);
    }

    #[test]
    fn rejects_future_schema() {
        let json = export_json(&sample_report())
            .unwrap()
            .replace("\"schema_version\": 1", "\"schema_version\": 99");
        let err = import_json(&json).unwrap_err();
        assert!(err.to_string().contains("unsupported schema version"));
    }

    #[test]
    fn table_csv_has_header_and_rows() {
        let csv = export_table_csv(&sample_report().cm).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("rank,symbol,verdict"));
        assert!(lines[1].starts_with("1,RISE,"));
    }

    #[test]
    fn indicators_csv_lists_fallbacks() {
        let csv = export_indicators_csv(&sample_report().evaluations).unwrap();
        let flat = csv.lines().find(|l| l.starts_with("FLAT")).unwrap();
        assert!(flat.contains("Energy"));
    }

    #[test]
    fn rebased_csv_blanks_undefined_values() {
        let dates: Vec<NaiveDate> = (1..=3)
            .map(|d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap())
            .collect();
        let series = RebasedSeries {
            symbol: "SPY".into(),
            anchor: 0,
            reference_price: 10.0,
            values: vec![f64::NAN, -0.5, 0.0],
            average: vec![f64::NAN, f64::NAN, -0.25],
        };
        let csv = export_rebased_csv(&dates, &[series]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "date,SPY,SPY_avg");
        assert_eq!(lines[1], "2024-01-01,,");
        assert_eq!(lines[2], "2024-01-02,-50.0000,");
        assert_eq!(lines[3], "2024-01-03,0.0000,-25.0000");
    }

    #[test]
    fn text_marks_recommended_table() {
        let text = render_text(&sample_report());
        assert!(text.contains("CLR  <- recommended"));
        assert!(text.contains("skipped (no prices): VWO"));
        assert!(text.contains("RISE"));
    }
}
