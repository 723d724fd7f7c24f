//! Volatility drag: the gap between arithmetic and compounded return.
//!
//! drag = (stddev(returns) * sqrt(annualization))^2 / 2 over the trailing
//! window. The downside deviation uses only negative returns and is floored
//! so it can safely divide a score.

use serde::{Deserialize, Serialize};

use crate::domain::ReturnSeries;
use crate::indicators::{downside_std_dev, sample_std_dev};

/// Output of the drag estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragEstimate {
    /// Annualized volatility of all returns in the window.
    pub sigma: f64,
    /// Variance drag, `sigma^2 / 2`.
    pub drag: f64,
    /// Annualized volatility of negative returns, never below the floor.
    pub downside_deviation: f64,
    /// Number of returns the estimate was computed from.
    pub sample_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolatilityDragEstimator {
    window: usize,
    annualization: f64,
    downside_floor: f64,
}

impl VolatilityDragEstimator {
    pub fn new(window: usize, annualization: usize, downside_floor: f64) -> Self {
        Self {
            window,
            annualization: annualization as f64,
            downside_floor,
        }
    }

    /// Whether `returns` holds enough observations for a real estimate.
    pub fn has_sample(&self, returns: &ReturnSeries) -> bool {
        returns.tail(self.window).len() >= 2
    }

    pub fn estimate(&self, returns: &ReturnSeries) -> DragEstimate {
        let window = returns.tail(self.window);
        let scale = self.annualization.sqrt();
        let sigma = sample_std_dev(window) * scale;
        let downside = downside_std_dev(window) * scale;

        DragEstimate {
            sigma,
            drag: annualized_drag(sigma),
            downside_deviation: downside.max(self.downside_floor),
            sample_size: window.len(),
        }
    }
}

/// Variance drag of an annualized volatility.
pub fn annualized_drag(sigma: f64) -> f64 {
    sigma * sigma / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    fn estimator() -> VolatilityDragEstimator {
        VolatilityDragEstimator::new(756, 252, 1e-6)
    }

    #[test]
    fn flat_returns_have_no_drag() {
        let returns = ReturnSeries::new(vec![0.0; 800]);
        let est = estimator().estimate(&returns);
        assert_eq!(est.drag, 0.0);
        assert_eq!(est.sigma, 0.0);
        assert_eq!(est.downside_deviation, 1e-6);
        assert_eq!(est.sample_size, 756);
    }

    #[test]
    fn known_drag() {
        // Alternating +1% / -1%: sample std ~ 0.01 * sqrt(n/(n-1))
        let returns: Vec<f64> = (0..756).map(|i| if i % 2 == 0 { 0.01 } else { -0.01 }).collect();
        let est = estimator().estimate(&ReturnSeries::new(returns.clone()));
        let sigma = sample_std_dev(&returns) * 252.0_f64.sqrt();
        assert_approx(est.sigma, sigma, DEFAULT_EPSILON);
        assert_approx(est.drag, sigma * sigma / 2.0, DEFAULT_EPSILON);
        // roughly 0.0126 for 1% daily moves
        assert!(est.drag > 0.012 && est.drag < 0.0130, "drag = {}", est.drag);
    }

    #[test]
    fn only_trailing_window_counts() {
        let mut returns = vec![0.2, -0.2, 0.2, -0.2];
        returns.extend(vec![0.0; 756]);
        let est = estimator().estimate(&ReturnSeries::new(returns));
        assert_eq!(est.drag, 0.0);
    }

    #[test]
    fn short_series_uses_what_is_there() {
        let returns = ReturnSeries::new(vec![0.01, -0.01, 0.02]);
        assert!(estimator().has_sample(&returns));
        assert_eq!(estimator().estimate(&returns).sample_size, 3);
        assert!(!estimator().has_sample(&ReturnSeries::new(vec![0.01])));
    }

    #[test]
    fn downside_deviation_is_floored() {
        let returns = ReturnSeries::new(vec![0.01, 0.02, 0.03]);
        let est = estimator().estimate(&returns);
        assert_eq!(est.downside_deviation, 1e-6);
    }
}
