//! Anchored returns: a reference price set back from the last observation,
//! measured against one earlier price or an average of several.
//!
//! Offsets count trading days back from the last observation, so offset 0
//! is the latest price and offset 252 the price one year earlier.

use serde::{Deserialize, Serialize};

use crate::domain::price_series::price_back;
use crate::error::ScoreError;

/// Trading days per month, quarter and year.
pub const MONTH: usize = 21;
pub const QUARTER: usize = 63;
pub const YEAR: usize = 252;

/// How several baseline prices collapse into one return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineFormula {
    /// `reference / mean(baselines) - 1`.
    #[default]
    MeanOfPrices,
    /// `mean(reference / baseline_k - 1)`.
    MeanOfRatios,
}

/// An immutable lookback scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnchorSpec {
    /// `p[n-1-reference] / p[n-1-base] - 1`.
    Single { reference: usize, base: usize },
    /// Reference price against several baseline prices.
    Averaged {
        reference: usize,
        baselines: Vec<usize>,
        #[serde(default)]
        formula: BaselineFormula,
    },
}

impl AnchorSpec {
    /// One year back against the average of three, four and five years back.
    pub fn clr_default() -> Self {
        AnchorSpec::Averaged {
            reference: YEAR,
            baselines: vec![3 * YEAR, 4 * YEAR, 5 * YEAR],
            formula: BaselineFormula::MeanOfPrices,
        }
    }

    /// The three months ending one month ago.
    pub fn cm_default() -> Self {
        AnchorSpec::Single {
            reference: MONTH,
            base: MONTH + QUARTER,
        }
    }

    /// Offset of the price the return is measured to.
    pub fn reference(&self) -> usize {
        match self {
            AnchorSpec::Single { reference, .. } | AnchorSpec::Averaged { reference, .. } => {
                *reference
            }
        }
    }

    /// Largest offset the scheme reads.
    pub fn max_offset(&self) -> usize {
        match self {
            AnchorSpec::Single { reference, base } => (*reference).max(*base),
            AnchorSpec::Averaged {
                reference,
                baselines,
                ..
            } => baselines.iter().copied().fold(*reference, usize::max),
        }
    }

    /// Minimum series length the scheme needs.
    pub fn required_history(&self) -> usize {
        self.max_offset() + 1
    }

    /// Raw fractional return of the scheme over `prices`.
    pub fn anchor_return(&self, prices: &[f64]) -> Result<f64, ScoreError> {
        if prices.len() < self.required_history() {
            return Err(ScoreError::InsufficientHistory {
                required: self.required_history(),
                available: prices.len(),
            });
        }

        match self {
            AnchorSpec::Single { reference, base } => {
                let reference_price = price_back(prices, *reference)?;
                let base_price = price_back(prices, *base)?;
                Ok(reference_price / base_price - 1.0)
            }
            AnchorSpec::Averaged {
                reference,
                baselines,
                formula,
            } => {
                if baselines.is_empty() {
                    return Err(ScoreError::EmptyBaseline);
                }
                let reference_price = price_back(prices, *reference)?;
                let baseline_prices = baselines
                    .iter()
                    .map(|&offset| price_back(prices, offset))
                    .collect::<Result<Vec<f64>, ScoreError>>()?;
                let count = baseline_prices.len() as f64;

                let value = match formula {
                    BaselineFormula::MeanOfPrices => {
                        let baseline = baseline_prices.iter().sum::<f64>() / count;
                        reference_price / baseline - 1.0
                    }
                    BaselineFormula::MeanOfRatios => {
                        baseline_prices
                            .iter()
                            .map(|b| reference_price / b - 1.0)
                            .sum::<f64>()
                            / count
                    }
                };
                Ok(value)
            }
        }
    }
}
