//! Error types for the scoring engine.
//!
//! These errors never cross the per-asset boundary: `ScoringEngine::evaluate`
//! converts every `ScoreError` into a neutral value plus a recorded
//! `Fallback`, so one short history cannot abort a batch.

use thiserror::Error;

/// Failure of a single numeric transform.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    #[error("insufficient history: need at least {required} prices, have {available}")]
    InsufficientHistory { required: usize, available: usize },

    #[error("invalid price {value} at index {index}")]
    InvalidPrice { index: usize, value: f64 },

    #[error("anchor has no baseline offsets")]
    EmptyBaseline,
}
