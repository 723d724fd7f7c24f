//! Trend position: last price against its long simple moving average.

use serde::{Deserialize, Serialize};

use crate::domain::TrendPosition;
use crate::indicators::{last_defined, Indicator, Sma};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendReading {
    pub position: TrendPosition,
    /// Moving average at the last observation, if defined.
    pub average: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct TrendGauge {
    average: Sma,
}

impl TrendGauge {
    pub fn new(period: usize) -> Self {
        Self {
            average: Sma::new(period),
        }
    }

    /// `None` when the series is too short for the average or ends on a missing price.
    pub fn read(&self, prices: &[f64]) -> Option<TrendReading> {
        let last = last_defined(prices)?;
        let average = last_defined(&self.average.compute(prices))?;
        // A price sitting exactly on its average counts as above.
        let position = if last >= average {
            TrendPosition::Above
        } else {
            TrendPosition::Below
        };
        Some(TrendReading {
            position,
            average: Some(average),
        })
    }

    /// Reading used when history is too short: conservatively below trend.
    pub fn fallback() -> TrendReading {
        TrendReading {
            position: TrendPosition::Below,
            average: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_series_is_above() {
        let reading = TrendGauge::new(200).read(&[100.0; 250]).unwrap();
        assert_eq!(reading.position, TrendPosition::Above);
        assert_eq!(reading.average, Some(100.0));
    }

    #[test]
    fn falling_series_is_below() {
        let prices: Vec<f64> = (0..250).map(|i| 300.0 - i as f64).collect();
        let reading = TrendGauge::new(200).read(&prices).unwrap();
        assert_eq!(reading.position, TrendPosition::Below);
    }

    #[test]
    fn rising_series_is_above() {
        let prices: Vec<f64> = (0..250).map(|i| 100.0 + i as f64).collect();
        assert_eq!(
            TrendGauge::new(200).read(&prices).unwrap().position,
            TrendPosition::Above
        );
    }

    #[test]
    fn short_series_has_no_reading() {
        assert!(TrendGauge::new(200).read(&[100.0; 199]).is_none());
        assert_eq!(TrendGauge::fallback().position, TrendPosition::Below);
    }
}
