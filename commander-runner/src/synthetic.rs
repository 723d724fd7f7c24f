//! Synthetic price tables for development and benchmarks.
//!
//! Each symbol gets a random walk seeded from the BLAKE3 hash of its name, so
//! the same universe and date range always produce the same table. Weekends
//! are skipped; holidays are not modelled.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::price_table::{LoadError, PriceTable};

/// Weekday dates in `[start, end]`.
pub fn trading_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .collect()
}

/// Deterministic random-walk closes for one symbol.
pub fn synthetic_prices(symbol: &str, days: usize) -> Vec<f64> {
    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    // Per-symbol drift and volatility so the universe is not uniform.
    let drift: f64 = rng.gen_range(-0.0002..0.0006);
    let volatility: f64 = rng.gen_range(0.005..0.02);
    let mut price: f64 = rng.gen_range(20.0..500.0);

    (0..days)
        .map(|_| {
            let shock: f64 = rng.gen_range(-1.0..1.0) * volatility * 3.0_f64.sqrt();
            price *= 1.0 + drift + shock;
            price = price.max(0.01);
            price
        })
        .collect()
}

/// A full table for `symbols` over the weekdays in `[start, end]`.
pub fn synthetic_table(
    symbols: &[String],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<PriceTable, LoadError> {
    let dates = trading_days(start, end);
    if dates.is_empty() {
        return Err(LoadError::EmptyTable);
    }
    let columns: BTreeMap<String, Vec<f64>> = symbols
        .iter()
        .map(|s| (s.clone(), synthetic_prices(s, dates.len())))
        .collect();
    PriceTable::new(dates, columns)
}
