//! Exponential Moving Average (EMA) with span-based smoothing.
//!
//! alpha = 2 / (span + 1). Two forms:
//! - Recursive: EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1], seeded with
//!   the first defined value.
//! - Adjusted: EMA[t] = sum_i (1-alpha)^i x[t-i] / sum_i (1-alpha)^i over all
//!   defined values so far, which removes the bias of the first observation.
//!
//! Leading NaNs are skipped. An interior NaN yields NaN at that position and
//! leaves the smoothing state untouched.

use serde::{Deserialize, Serialize};

use super::Indicator;

/// Which EMA recurrence to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmaForm {
    #[default]
    Recursive,
    Adjusted,
}

#[derive(Debug, Clone)]
pub struct Ema {
    span: usize,
    form: EmaForm,
    name: String,
}

impl Ema {
    pub fn new(span: usize, form: EmaForm) -> Self {
        assert!(span >= 1, "EMA span must be >= 1");
        Self {
            span,
            form,
            name: format!("ema_{span}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, values: &[f64]) -> Vec<f64> {
        ema_of_series(values, self.span, self.form)
    }
}

/// Compute an EMA over an arbitrary f64 series.
pub fn ema_of_series(values: &[f64], span: usize, form: EmaForm) -> Vec<f64> {
    let mut result = vec![f64::NAN; values.len()];
    if span == 0 {
        return result;
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let decay = 1.0 - alpha;

    match form {
        EmaForm::Recursive => {
            let mut prev: Option<f64> = None;
            for (out, &x) in result.iter_mut().zip(values) {
                if x.is_nan() {
                    continue;
                }
                let ema = match prev {
                    Some(p) => alpha * x + decay * p,
                    None => x,
                };
                *out = ema;
                prev = Some(ema);
            }
        }
        EmaForm::Adjusted => {
            let mut numerator = 0.0;
            let mut denominator = 0.0;
            for (out, &x) in result.iter_mut().zip(values) {
                if x.is_nan() {
                    continue;
                }
                numerator = x + decay * numerator;
                denominator = 1.0 + decay * denominator;
                *out = numerator / denominator;
            }
        }
    }

    result
}
