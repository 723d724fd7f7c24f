//! Commander Core: the signal scoring engine.
//!
//! Pure numeric transforms from a daily price series to allocation verdicts:
//! - Domain types (price/return series, energy and trend states, judgments)
//! - Series primitives (EMA, SMA, TSI, sample statistics)
//! - Scoring components (anchored returns, volatility drag, energy trigger,
//!   trend gauge, score compositor, judgment classifier, regime selector)
//! - `ScoringEngine`: the configured per-asset pipeline
//!
//! Nothing in this crate performs I/O or keeps state between evaluations.

pub mod components;
pub mod domain;
pub mod engine;
pub mod error;
pub mod indicators;

pub use engine::{AssetEvaluation, EngineConfig, Fallback, Indicators, ScoringEngine};
pub use error::ScoreError;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything shared across worker threads is Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::PriceSeries>();
        require_sync::<domain::PriceSeries>();
        require_send::<domain::ReturnSeries>();
        require_sync::<domain::ReturnSeries>();
        require_send::<domain::Judgment>();
        require_sync::<domain::Judgment>();

        require_send::<engine::EngineConfig>();
        require_sync::<engine::EngineConfig>();
        require_send::<engine::ScoringEngine>();
        require_sync::<engine::ScoringEngine>();
        require_send::<engine::AssetEvaluation>();
        require_sync::<engine::AssetEvaluation>();

        require_send::<components::RegimeState>();
        require_sync::<components::RegimeState>();
        require_send::<components::AnchorSpec>();
        require_sync::<components::AnchorSpec>();
    }

    /// The engine's evaluate takes `&self`: one instance serves every worker.
    #[test]
    fn engine_is_shareable_across_threads() {
        let engine = std::sync::Arc::new(ScoringEngine::new(EngineConfig::default()).unwrap());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let engine = std::sync::Arc::clone(&engine);
                std::thread::spawn(move || {
                    let prices = domain::PriceSeries::new(vec![100.0 + i as f64; 300]);
                    engine.evaluate("T", &prices, 0.0).clr.score
                })
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), 0.0);
        }
    }
}
