//! Regime selection from an external valuation percentile.
//!
//! Annotation only: the selected model marks which judgment table is
//! currently recommended and never feeds back into per-asset scores.

use serde::{Deserialize, Serialize};

use crate::domain::Model;

/// The valuation percentile and the model it favors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeState {
    pub valuation_percentile: f64,
    pub active: Model,
}

impl RegimeState {
    pub fn recommends(&self, model: Model) -> bool {
        self.active == model
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegimeSelector {
    boundary: f64,
}

impl RegimeSelector {
    pub fn new(boundary: f64) -> Self {
        Self { boundary }
    }

    /// Cheap markets (below the boundary) favor reversion; the boundary itself
    /// and anything above favor momentum. A NaN percentile falls on the CM side.
    pub fn select(&self, valuation_percentile: f64) -> RegimeState {
        let active = if valuation_percentile < self.boundary {
            Model::Clr
        } else {
            Model::Cm
        };
        RegimeState {
            valuation_percentile,
            active,
        }
    }
}

impl Default for RegimeSelector {
    fn default() -> Self {
        Self::new(0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_belongs_to_cm() {
        let selector = RegimeSelector::default();
        assert_eq!(selector.select(0.45).active, Model::Clr);
        assert_eq!(selector.select(0.4999).active, Model::Clr);
        assert_eq!(selector.select(0.5).active, Model::Cm);
        assert_eq!(selector.select(0.9).active, Model::Cm);
    }

    #[test]
    fn extremes() {
        let selector = RegimeSelector::default();
        assert_eq!(selector.select(0.0).active, Model::Clr);
        assert_eq!(selector.select(1.0).active, Model::Cm);
        assert_eq!(selector.select(f64::NAN).active, Model::Cm);
    }

    #[test]
    fn recommends_matches_active() {
        let state = RegimeSelector::default().select(0.3);
        assert!(state.recommends(Model::Clr));
        assert!(!state.recommends(Model::Cm));
        assert_eq!(state.valuation_percentile, 0.3);
    }
}
