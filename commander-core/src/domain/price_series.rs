//! Price and return series for a single asset.
//!
//! Callers guarantee a forward-filled, gap-free daily series ordered by date.
//! The engine never fills gaps itself; it only tolerates series that are too
//! short for a given lookback.

use serde::{Deserialize, Serialize};

use crate::error::ScoreError;

/// Ordered daily closing prices for one asset, oldest first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceSeries {
    prices: Vec<f64>,
}

impl PriceSeries {
    pub fn new(prices: Vec<f64>) -> Self {
        Self { prices }
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.prices
    }

    /// Most recent observation.
    pub fn last(&self) -> Option<f64> {
        self.prices.last().copied()
    }

    /// Price `offset` trading days before the last observation, i.e. `p[n-1-offset]`.
    pub fn back(&self, offset: usize) -> Result<f64, ScoreError> {
        price_back(&self.prices, offset)
    }

    /// The series as it looked `shift` trading days ago (the last `shift` prices dropped).
    pub fn shifted(&self, shift: usize) -> Option<&[f64]> {
        if shift >= self.prices.len() {
            return None;
        }
        Some(&self.prices[..self.prices.len() - shift])
    }

    /// Percentage changes between consecutive prices.
    pub fn returns(&self) -> ReturnSeries {
        ReturnSeries::from_prices(&self.prices)
    }
}

impl From<Vec<f64>> for PriceSeries {
    fn from(prices: Vec<f64>) -> Self {
        Self::new(prices)
    }
}

/// `p[n-1-offset]` on a raw slice, rejecting missing or non-positive prices.
pub fn price_back(prices: &[f64], offset: usize) -> Result<f64, ScoreError> {
    let n = prices.len();
    if offset >= n {
        return Err(ScoreError::InsufficientHistory {
            required: offset + 1,
            available: n,
        });
    }
    let index = n - 1 - offset;
    let value = prices[index];
    if !value.is_finite() || value <= 0.0 {
        return Err(ScoreError::InvalidPrice { index, value });
    }
    Ok(value)
}

/// Daily fractional returns, one element shorter than the price series.
///
/// Pairs touching a missing or non-positive price produce no element, so a
/// return never spans missing data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReturnSeries {
    returns: Vec<f64>,
}

impl ReturnSeries {
    pub fn new(returns: Vec<f64>) -> Self {
        Self { returns }
    }

    pub fn from_prices(prices: &[f64]) -> Self {
        let returns = prices
            .windows(2)
            .filter(|w| w[0].is_finite() && w[1].is_finite() && w[0] > 0.0 && w[1] > 0.0)
            .map(|w| (w[1] - w[0]) / w[0])
            .collect();
        Self { returns }
    }

    pub fn len(&self) -> usize {
        self.returns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.returns
    }

    /// The trailing `window` returns (all of them if the series is shorter).
    pub fn tail(&self, window: usize) -> &[f64] {
        let start = self.returns.len().saturating_sub(window);
        &self.returns[start..]
    }
}
