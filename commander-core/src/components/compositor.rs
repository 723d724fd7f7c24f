//! Composite scores: anchored return net of volatility drag.
//!
//! net = anchor - drag. The margin-bonus rule inflates a positive net return
//! by `margin * tax_rate`; a non-positive net return passes through exactly,
//! so the bonus never changes the sign of a score.

use serde::{Deserialize, Serialize};

/// How a net return becomes the score a judgment is made on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeRule {
    /// `net`
    Unweighted,
    /// `net + margin * tax_rate * max(0, net)`
    MarginBonus,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreCompositor {
    tax_rate: f64,
    downside_floor: f64,
}

impl ScoreCompositor {
    pub fn new(tax_rate: f64, downside_floor: f64) -> Self {
        Self {
            tax_rate,
            downside_floor,
        }
    }

    pub fn net_return(anchor_return: f64, drag: f64) -> f64 {
        anchor_return - drag
    }

    pub fn compose(&self, rule: CompositeRule, anchor_return: f64, drag: f64, margin: f64) -> f64 {
        let net = Self::net_return(anchor_return, drag);
        match rule {
            CompositeRule::Unweighted => net,
            CompositeRule::MarginBonus => {
                if net > 0.0 {
                    net + margin * self.tax_rate * net
                } else {
                    net
                }
            }
        }
    }

    /// `net / sigma_down` with the denominator floored; a ranking aid only.
    pub fn downside_normalized(&self, net: f64, downside_deviation: f64) -> f64 {
        let denominator = if downside_deviation.is_finite() {
            downside_deviation.max(self.downside_floor)
        } else {
            return 0.0;
        };
        if denominator <= 0.0 {
            return 0.0;
        }
        net / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    fn compositor() -> ScoreCompositor {
        ScoreCompositor::new(0.20315, 1e-6)
    }

    #[test]
    fn margin_bonus_inflates_positive_net() {
        // net = 0.10 - 0.02 = 0.08; bonus = 0.20 * 0.20315 * 0.08
        let score = compositor().compose(CompositeRule::MarginBonus, 0.10, 0.02, 0.20);
        assert_approx(score, 0.08 + 0.20 * 0.20315 * 0.08, DEFAULT_EPSILON);
    }

    #[test]
    fn margin_bonus_leaves_negative_net_untouched() {
        let score = compositor().compose(CompositeRule::MarginBonus, -0.05, 0.01, 0.50);
        assert_eq!(score, -0.05 - 0.01);
    }

    #[test]
    fn zero_margin_is_plain_net() {
        let score = compositor().compose(CompositeRule::MarginBonus, 0.10, 0.02, 0.0);
        assert_approx(score, 0.08, DEFAULT_EPSILON);
    }

    #[test]
    fn unweighted_ignores_margin() {
        let score = compositor().compose(CompositeRule::Unweighted, 0.08, 0.01, 0.9);
        assert_approx(score, 0.07, DEFAULT_EPSILON);
    }

    #[test]
    fn normalized_divides_by_downside() {
        assert_approx(compositor().downside_normalized(0.07, 0.14), 0.5, DEFAULT_EPSILON);
    }

    #[test]
    fn normalized_floors_zero_denominator() {
        assert_approx(compositor().downside_normalized(1e-6, 0.0), 1.0, DEFAULT_EPSILON);
        assert_eq!(compositor().downside_normalized(0.1, f64::NAN), 0.0);
    }
}
