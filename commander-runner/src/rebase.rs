//! Rebased series: prices re-expressed against the price at an anchor offset.
//!
//! `rebased[i] = p[i] / p[n-1-anchor] - 1`, so the anchor day reads 0 and
//! the last value is the return since the anchor. The long moving average is
//! rebased against the same price, which puts price, average and zero line
//! on one axis.

use serde::{Deserialize, Serialize};

use commander_core::indicators::sma_of_series;

use crate::price_table::PriceTable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebasedSeries {
    pub symbol: String,
    pub anchor: usize,
    /// Price at the anchor offset.
    pub reference_price: f64,
    /// Rebased prices aligned to the table's dates; NaN before listing.
    pub values: Vec<f64>,
    /// Rebased moving average; NaN until the window fills.
    pub average: Vec<f64>,
}

/// Rebase one raw column (leading NaN allowed) at `anchor` days back.
///
/// `None` if the column is shorter than the anchor or the anchor price is unusable.
pub fn rebase_column(
    prices: &[f64],
    anchor: usize,
    average_period: usize,
) -> Option<(f64, Vec<f64>, Vec<f64>)> {
    let n = prices.len();
    if anchor >= n {
        return None;
    }
    let reference = prices[n - 1 - anchor];
    if !reference.is_finite() || reference <= 0.0 {
        return None;
    }
    let rebase = |v: f64| v / reference - 1.0;
    let values = prices.iter().map(|&p| rebase(p)).collect();

    // The average is computed from the first listed price so leading gaps
    // don't poison the window.
    let first = prices.iter().position(|p| p.is_finite()).unwrap_or(n);
    let mut average = vec![f64::NAN; first];
    average.extend(
        sma_of_series(&prices[first..], average_period)
            .into_iter()
            .map(rebase),
    );
    Some((reference, values, average))
}

/// Rebase each requested symbol from `table`. Unknown or too-short symbols are omitted.
pub fn rebase_symbols(
    table: &PriceTable,
    symbols: &[String],
    anchor: usize,
    average_period: usize,
) -> Vec<RebasedSeries> {
    symbols
        .iter()
        .filter_map(|symbol| {
            let column = table.column(symbol)?;
            let (reference_price, values, average) =
                rebase_column(column, anchor, average_period)?;
            Some(RebasedSeries {
                symbol: symbol.clone(),
                anchor,
                reference_price,
                values,
                average,
            })
        })
        .collect()
}
