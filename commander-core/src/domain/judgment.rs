//! Categorical verdicts and the two return models that produce them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The two competing return models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Model {
    /// Long-horizon reversion: one-year-ago anchor against a 3-5 year baseline.
    Clr,
    /// Medium-horizon momentum: one-month-ago anchor over a three-month window.
    Cm,
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::Clr => write!(f, "CLR"),
            Model::Cm => write!(f, "CM"),
        }
    }
}

/// Allocation verdict for one asset under one model.
///
/// Capital is never half-committed: `Full` and `Keep` mean the whole intended
/// allocation, `Reduce` is the single fractional exception, everything else
/// means nothing allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Full,
    Wait,
    Exit,
    Sell,
    Reduce,
    Keep,
}

impl Verdict {
    /// Fraction of intended capital implied by this verdict.
    pub fn allocation(self, reduce_fraction: f64) -> f64 {
        match self {
            Verdict::Full | Verdict::Keep => 1.0,
            Verdict::Reduce => reduce_fraction,
            Verdict::Wait | Verdict::Exit | Verdict::Sell => 0.0,
        }
    }

    pub fn is_committed(self) -> bool {
        matches!(self, Verdict::Full | Verdict::Keep)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Verdict::Full => "FULL",
            Verdict::Wait => "WAIT",
            Verdict::Exit => "EXIT",
            Verdict::Sell => "SELL",
            Verdict::Reduce => "REDUCE",
            Verdict::Keep => "KEEP",
        };
        write!(f, "{label}")
    }
}

/// A verdict together with the composite score that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Judgment {
    pub model: Model,
    pub verdict: Verdict,
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_never_half_commits() {
        assert_eq!(Verdict::Full.allocation(0.5), 1.0);
        assert_eq!(Verdict::Keep.allocation(0.5), 1.0);
        assert_eq!(Verdict::Wait.allocation(0.5), 0.0);
        assert_eq!(Verdict::Exit.allocation(0.5), 0.0);
        assert_eq!(Verdict::Sell.allocation(0.5), 0.0);
    }

    #[test]
    fn reduce_uses_configured_haircut() {
        assert_eq!(Verdict::Reduce.allocation(0.5), 0.5);
        assert_eq!(Verdict::Reduce.allocation(0.25), 0.25);
    }

    #[test]
    fn verdict_serializes_as_label() {
        let json = serde_json::to_string(&Verdict::Reduce).unwrap();
        assert_eq!(json, "\"REDUCE\"");
        assert_eq!(Verdict::Full.to_string(), "FULL");
        assert_eq!(Model::Cm.to_string(), "CM");
    }
}
