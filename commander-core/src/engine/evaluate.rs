//! Per-asset pipeline: price series in, indicators and two judgments out.
//!
//! Anchors, drag, energy and trend are read independently from the same
//! series, composed into two scores and classified. Any component that
//! cannot produce a reading substitutes its neutral value and records a
//! `Fallback`; evaluation itself never fails.

use serde::{Deserialize, Serialize};

use crate::components::{
    AnchorSpec, CmPolicy, EnergyOscillator, EnergyReading, JudgmentClassifier, MomentumHistory,
    RegimeSelector, RegimeState, ScoreCompositor, TrendGauge, TrendReading,
    VolatilityDragEstimator,
};
use crate::domain::{Judgment, Model, MomentumDirection, PriceSeries};

use super::config::{ConfigError, EngineConfig};

/// A component that degraded to its neutral value for one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "component", rename_all = "snake_case")]
pub enum Fallback {
    /// CLR anchor return replaced by 0.
    ClrAnchor { reason: String },
    /// CM anchor return replaced by 0.
    CmAnchor { reason: String },
    /// Fewer than two returns: drag replaced by 0.
    Drag { sample_size: usize },
    /// Oscillator undefined at the last observation: read as DEAD.
    Energy,
    /// Moving average undefined: read as BELOW.
    Trend,
    /// Momentum `lookback` days earlier unavailable: compared as not declining.
    Momentum { lookback: usize },
}

/// Everything computed for one asset in one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicators {
    pub last_price: Option<f64>,
    /// Raw long-horizon anchored return.
    pub clr_value: f64,
    /// Raw medium-horizon anchored return.
    pub cm_value: f64,
    /// Annualized volatility over the drag window.
    pub sigma: f64,
    pub volatility_drag: f64,
    pub downside_deviation: f64,
    pub energy: EnergyReading,
    pub trend: TrendReading,
    /// Present only under the graduated momentum policy.
    pub momentum: Option<MomentumHistory>,
    pub composite_clr: f64,
    pub composite_cm: f64,
    /// CM net return over downside deviation, for ranking.
    pub cm_normalized: f64,
}

/// Result of evaluating one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetEvaluation {
    pub symbol: String,
    pub margin: f64,
    pub indicators: Indicators,
    pub clr: Judgment,
    pub cm: Judgment,
    pub fallbacks: Vec<Fallback>,
}

impl AssetEvaluation {
    pub fn judgment(&self, model: Model) -> &Judgment {
        match model {
            Model::Clr => &self.clr,
            Model::Cm => &self.cm,
        }
    }

    /// Fraction of intended capital under `model`.
    pub fn allocation(&self, model: Model, reduce_fraction: f64) -> f64 {
        self.judgment(model).verdict.allocation(reduce_fraction)
    }

    pub fn is_degraded(&self) -> bool {
        !self.fallbacks.is_empty()
    }
}

/// The configured pipeline, immutable once built.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    config: EngineConfig,
    drag: VolatilityDragEstimator,
    energy: EnergyOscillator,
    trend: TrendGauge,
    compositor: ScoreCompositor,
    classifier: JudgmentClassifier,
    regime: RegimeSelector,
}

impl ScoringEngine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let drag = VolatilityDragEstimator::new(
            config.drag.window,
            config.drag.annualization,
            config.drag.downside_floor,
        );
        let energy = EnergyOscillator::new(
            config.energy.long_span,
            config.energy.short_span,
            config.energy.signal_span,
            config.energy.signal_form,
        );
        let trend = TrendGauge::new(config.trend.period);
        let compositor =
            ScoreCompositor::new(config.composite.tax_rate, config.drag.downside_floor);
        let classifier =
            JudgmentClassifier::new(config.judgment.full_threshold, config.judgment.cm_policy);
        let regime = RegimeSelector::new(config.regime.boundary);

        Ok(Self {
            config,
            drag,
            energy,
            trend,
            compositor,
            classifier,
            regime,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn regime(&self, valuation_percentile: f64) -> RegimeState {
        self.regime.select(valuation_percentile)
    }

    /// Run the full pipeline on one asset. `margin` is its structural yield (0 if unknown).
    pub fn evaluate(&self, symbol: &str, prices: &PriceSeries, margin: f64) -> AssetEvaluation {
        let mut fallbacks = Vec::new();
        let raw = prices.as_slice();

        let clr_value = match self.config.anchors.clr.anchor_return(raw) {
            Ok(v) => v,
            Err(e) => {
                fallbacks.push(Fallback::ClrAnchor {
                    reason: e.to_string(),
                });
                0.0
            }
        };
        let cm_value = match self.config.anchors.cm.anchor_return(raw) {
            Ok(v) => v,
            Err(e) => {
                fallbacks.push(Fallback::CmAnchor {
                    reason: e.to_string(),
                });
                0.0
            }
        };

        let returns = prices.returns();
        if !self.drag.has_sample(&returns) {
            fallbacks.push(Fallback::Drag {
                sample_size: returns.len(),
            });
        }
        let drag = self.drag.estimate(&returns);

        let energy = self.energy.read(raw);
        if !energy.is_defined() {
            fallbacks.push(Fallback::Energy);
        }

        let trend = self.trend.read(raw).unwrap_or_else(|| {
            fallbacks.push(Fallback::Trend);
            TrendGauge::fallback()
        });

        let momentum = match self.classifier.cm_policy() {
            CmPolicy::Binary => None,
            CmPolicy::Graduated => Some(self.momentum_history(prices, cm_value, &mut fallbacks)),
        };

        let margin = if margin.is_finite() { margin.max(0.0) } else { 0.0 };
        let composite_clr = self.compositor.compose(
            self.config.composite.clr_rule,
            clr_value,
            drag.drag,
            margin,
        );
        let composite_cm =
            self.compositor
                .compose(self.config.composite.cm_rule, cm_value, drag.drag, margin);
        let cm_normalized = self.compositor.downside_normalized(
            ScoreCompositor::net_return(cm_value, drag.drag),
            drag.downside_deviation,
        );

        let clr = self.classifier.classify_clr(composite_clr, energy.state);
        let cm = self.classifier.classify_cm(
            composite_cm,
            energy.state,
            trend.position,
            momentum.unwrap_or_else(MomentumHistory::steady),
        );

        AssetEvaluation {
            symbol: symbol.to_string(),
            margin,
            indicators: Indicators {
                last_price: prices.last(),
                clr_value,
                cm_value,
                sigma: drag.sigma,
                volatility_drag: drag.drag,
                downside_deviation: drag.downside_deviation,
                energy,
                trend,
                momentum,
                composite_clr,
                composite_cm,
                cm_normalized,
            },
            clr,
            cm,
            fallbacks,
        }
    }

    /// Current CM return against the same return re-evaluated on the series
    /// as it stood `short_lookback` and `medium_lookback` days ago.
    fn momentum_history(
        &self,
        prices: &PriceSeries,
        current: f64,
        fallbacks: &mut Vec<Fallback>,
    ) -> MomentumHistory {
        let mut direction = |lookback: usize| {
            match earlier_anchor(&self.config.anchors.cm, prices, lookback) {
                Some(earlier) => MomentumDirection::compare(current, earlier),
                None => {
                    fallbacks.push(Fallback::Momentum { lookback });
                    MomentumDirection::Up
                }
            }
        };
        let short_term = direction(self.config.judgment.short_lookback);
        let medium_term = direction(self.config.judgment.medium_lookback);
        MomentumHistory {
            short_term,
            medium_term,
        }
    }
}

fn earlier_anchor(scheme: &AnchorSpec, prices: &PriceSeries, shift: usize) -> Option<f64> {
    let history = prices.shifted(shift)?;
    scheme.anchor_return(history).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EnergyState, TrendPosition, Verdict};

    fn engine() -> ScoringEngine {
        ScoringEngine::new(EngineConfig::default()).unwrap()
    }

    fn graduated_engine() -> ScoringEngine {
        let mut config = EngineConfig::default();
        config.judgment.cm_policy = CmPolicy::Graduated;
        ScoringEngine::new(config).unwrap()
    }

    #[test]
    fn empty_series_degrades_everything() {
        let eval = engine().evaluate("EMPTY", &PriceSeries::default(), 0.0);
        assert_eq!(eval.indicators.clr_value, 0.0);
        assert_eq!(eval.indicators.cm_value, 0.0);
        assert_eq!(eval.indicators.volatility_drag, 0.0);
        assert_eq!(eval.indicators.energy.state, EnergyState::Dead);
        assert_eq!(eval.indicators.trend.position, TrendPosition::Below);
        assert_eq!(eval.clr.verdict, Verdict::Wait);
        assert_eq!(eval.cm.verdict, Verdict::Exit);
        assert_eq!(eval.indicators.last_price, None);
        assert!(eval.fallbacks.contains(&Fallback::Energy));
        assert!(eval.fallbacks.contains(&Fallback::Trend));
        assert!(eval.fallbacks.contains(&Fallback::Drag { sample_size: 0 }));
    }

    #[test]
    fn short_history_only_loses_long_anchor() {
        let prices: Vec<f64> = (0..400).map(|i| 100.0 * 1.001_f64.powi(i)).collect();
        let eval = engine().evaluate("SHORT", &PriceSeries::new(prices), 0.0);
        assert_eq!(eval.fallbacks.len(), 1);
        assert!(matches!(eval.fallbacks[0], Fallback::ClrAnchor { .. }));
        assert!(eval.indicators.cm_value > 0.0);
        assert_eq!(eval.indicators.clr_value, 0.0);
    }

    #[test]
    fn negative_margin_is_treated_as_zero() {
        let prices: Vec<f64> = (0..1300).map(|i| 100.0 * 1.0005_f64.powi(i)).collect();
        let series = PriceSeries::new(prices);
        let with_negative = engine().evaluate("X", &series, -1.0);
        let with_zero = engine().evaluate("X", &series, 0.0);
        assert_eq!(with_negative.margin, 0.0);
        assert_eq!(
            with_negative.indicators.composite_clr,
            with_zero.indicators.composite_clr
        );
    }

    #[test]
    fn binary_policy_skips_momentum_history() {
        let eval = engine().evaluate("X", &PriceSeries::new(vec![100.0; 300]), 0.0);
        assert_eq!(eval.indicators.momentum, None);
    }

    #[test]
    fn graduated_policy_reads_momentum_history() {
        // Momentum decelerating: fast rise that flattens out in the last months.
        let mut prices: Vec<f64> = (0..300).map(|i| 100.0 * 1.002_f64.powi(i)).collect();
        let top = *prices.last().unwrap();
        prices.extend((1..=60).map(|i| top * (1.0 + 0.0001 * i as f64)));
        let eval = graduated_engine().evaluate("DECEL", &PriceSeries::new(prices), 0.0);
        let momentum = eval.indicators.momentum.unwrap();
        assert_eq!(momentum.short_term, MomentumDirection::Down);
        assert_eq!(momentum.medium_term, MomentumDirection::Down);
        assert!(!eval.fallbacks.iter().any(|f| matches!(f, Fallback::Momentum { .. })));
    }

    #[test]
    fn graduated_missing_history_is_not_declining() {
        // Accelerating growth: the current window always beats earlier ones.
        let prices: Vec<f64> = (0..120)
            .map(|i| 100.0 * (0.0001 * (i * i) as f64).exp())
            .collect();
        let eval = graduated_engine().evaluate("YOUNG", &PriceSeries::new(prices), 0.0);
        let momentum = eval.indicators.momentum.unwrap();
        assert!(!momentum.is_declining());
        assert!(eval.fallbacks.contains(&Fallback::Momentum { lookback: 63 }));
    }

    #[test]
    fn allocation_follows_verdict() {
        let eval = engine().evaluate("FLAT", &PriceSeries::new(vec![100.0; 1300]), 0.0);
        assert_eq!(eval.allocation(Model::Clr, 0.5), 0.0);
        assert_eq!(eval.allocation(Model::Cm, 0.5), 0.0);
        assert_eq!(eval.judgment(Model::Cm).model, Model::Cm);
    }
}
