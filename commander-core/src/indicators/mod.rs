//! Numeric series primitives used by the scoring components.
//!
//! Every indicator is a pure function: a price (or derived) series in, a
//! series of the same length out. Positions without a defined value hold
//! `f64::NAN`; callers read the last element and treat NaN as "no reading".

pub mod ema;
pub mod sma;
pub mod stats;
pub mod tsi;

pub use ema::{ema_of_series, Ema, EmaForm};
pub use sma::{sma_of_series, Sma};
pub use stats::{downside_std_dev, mean, sample_std_dev};
pub use tsi::{true_strength, Tsi};

/// Trait for series indicators.
///
/// # Look-ahead contamination guard
/// No output at index t may depend on input at index t+1 or later. Computing
/// on a truncated series must reproduce the prefix of the full computation.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_200", "tsi_25_13").
    fn name(&self) -> &str;

    /// Number of leading positions that are always NaN.
    fn lookback(&self) -> usize;

    /// Compute the indicator over the whole series.
    fn compute(&self, values: &[f64]) -> Vec<f64>;
}

/// Last element of a computed series, if it is a real number.
pub fn last_defined(series: &[f64]) -> Option<f64> {
    series.last().copied().filter(|v| v.is_finite())
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
