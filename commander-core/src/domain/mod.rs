//! Domain types: price and return series, market states, judgments.

pub mod judgment;
pub mod price_series;
pub mod state;

pub use judgment::{Judgment, Model, Verdict};
pub use price_series::{PriceSeries, ReturnSeries};
pub use state::{EnergyState, MomentumDirection, TrendPosition};
