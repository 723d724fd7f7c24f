//! The scoring engine: configuration plus the per-asset pipeline.
//!
//! `ScoringEngine` is built once per evaluation cycle from an `EngineConfig`
//! and is immutable afterwards, so a single instance can be shared by every
//! worker evaluating assets in parallel.

pub mod config;
pub mod evaluate;

pub use config::{
    AnchorConfig, CompositeConfig, ConfigError, DragConfig, EnergyConfig, EngineConfig,
    JudgmentConfig, RegimeConfig, TrendConfig,
};
pub use evaluate::{AssetEvaluation, Fallback, Indicators, ScoringEngine};
