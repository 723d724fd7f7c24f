//! True Strength Index (TSI), bounded ratio form.
//!
//! diff[t]   = x[t] - x[t-1]
//! tsi[t]    = EMA_short(EMA_long(diff))[t] / EMA_short(EMA_long(|diff|))[t]
//!
//! Both smoothing passes use the recursive EMA form. The ratio lies in
//! [-1, 1]. Where the smoothed absolute change is below
//! `DEGENERATE_DENOMINATOR` (a flat series) the value is NaN.
//! Lookback: 1 (diff[0] is undefined).

use super::ema::{ema_of_series, EmaForm};
use super::Indicator;

/// Smoothed absolute change below which the ratio is treated as undefined.
pub const DEGENERATE_DENOMINATOR: f64 = 1e-12;

#[derive(Debug, Clone)]
pub struct Tsi {
    long_span: usize,
    short_span: usize,
    name: String,
}

impl Tsi {
    pub fn new(long_span: usize, short_span: usize) -> Self {
        assert!(long_span >= 1, "TSI long span must be >= 1");
        assert!(short_span >= 1, "TSI short span must be >= 1");
        Self {
            long_span,
            short_span,
            name: format!("tsi_{long_span}_{short_span}"),
        }
    }
}

impl Indicator for Tsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        1
    }

    fn compute(&self, values: &[f64]) -> Vec<f64> {
        true_strength(values, self.long_span, self.short_span)
    }
}

/// Double-smoothed momentum ratio of a price series.
pub fn true_strength(prices: &[f64], long_span: usize, short_span: usize) -> Vec<f64> {
    let n = prices.len();
    let mut diff = vec![f64::NAN; n];
    let mut abs_diff = vec![f64::NAN; n];
    for i in 1..n {
        let d = prices[i] - prices[i - 1];
        diff[i] = d;
        abs_diff[i] = d.abs();
    }

    let smooth = |series: &[f64]| {
        let first = ema_of_series(series, long_span, EmaForm::Recursive);
        ema_of_series(&first, short_span, EmaForm::Recursive)
    };
    let ema_v = smooth(&diff);
    let abs_ema_v = smooth(&abs_diff);

    ema_v
        .iter()
        .zip(&abs_ema_v)
        .map(|(&num, &den)| {
            if num.is_nan() || den.is_nan() || den.abs() < DEGENERATE_DENOMINATOR {
                f64::NAN
            } else {
                num / den
            }
        })
        .collect()
}
