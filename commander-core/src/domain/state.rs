//! Binary market states read off a single price series.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Output of the energy oscillator crossover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnergyState {
    /// Oscillator above its signal line.
    Ok,
    /// Oscillator at or below its signal line, or undefined.
    Dead,
}

impl EnergyState {
    pub fn is_ok(self) -> bool {
        self == EnergyState::Ok
    }
}

impl fmt::Display for EnergyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnergyState::Ok => write!(f, "OK"),
            EnergyState::Dead => write!(f, "DEAD"),
        }
    }
}

/// Last price relative to its long moving average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendPosition {
    Above,
    Below,
}

impl fmt::Display for TrendPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendPosition::Above => write!(f, "ABOVE"),
            TrendPosition::Below => write!(f, "BELOW"),
        }
    }
}

/// Whether the medium-horizon return has risen or fallen versus an earlier reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MomentumDirection {
    Up,
    Down,
}

impl MomentumDirection {
    /// `Down` when `current` is strictly below `earlier`.
    pub fn compare(current: f64, earlier: f64) -> Self {
        if current < earlier {
            MomentumDirection::Down
        } else {
            MomentumDirection::Up
        }
    }

    pub fn is_declining(self) -> bool {
        self == MomentumDirection::Down
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn momentum_compare_is_strict() {
        assert_eq!(MomentumDirection::compare(0.01, 0.02), MomentumDirection::Down);
        assert_eq!(MomentumDirection::compare(0.02, 0.02), MomentumDirection::Up);
        assert_eq!(MomentumDirection::compare(0.03, 0.02), MomentumDirection::Up);
    }

    #[test]
    fn display_matches_table_labels() {
        assert_eq!(EnergyState::Ok.to_string(), "OK");
        assert_eq!(EnergyState::Dead.to_string(), "DEAD");
        assert_eq!(TrendPosition::Above.to_string(), "ABOVE");
    }
}
