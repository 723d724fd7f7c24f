//! Judgment classification: (score, energy, trend) to a categorical verdict.
//!
//! Stateless; recomputed from scratch every cycle.

use serde::{Deserialize, Serialize};

use crate::domain::{EnergyState, Judgment, Model, MomentumDirection, TrendPosition, Verdict};

/// Verdict policy for the momentum model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CmPolicy {
    /// FULL when above trend, energy OK and score positive; otherwise EXIT.
    #[default]
    Binary,
    /// SELL / EXIT / REDUCE / KEEP ladder.
    Graduated,
}

/// Medium-horizon return now versus one and three months earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MomentumHistory {
    pub short_term: MomentumDirection,
    pub medium_term: MomentumDirection,
}

impl MomentumHistory {
    /// Neither comparison declining.
    pub fn steady() -> Self {
        Self {
            short_term: MomentumDirection::Up,
            medium_term: MomentumDirection::Up,
        }
    }

    pub fn is_declining(&self) -> bool {
        self.short_term.is_declining() || self.medium_term.is_declining()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JudgmentClassifier {
    full_threshold: f64,
    cm_policy: CmPolicy,
}

impl JudgmentClassifier {
    pub fn new(full_threshold: f64, cm_policy: CmPolicy) -> Self {
        Self {
            full_threshold,
            cm_policy,
        }
    }

    pub fn cm_policy(&self) -> CmPolicy {
        self.cm_policy
    }

    /// FULL only when the score clears the deadband and energy confirms.
    pub fn classify_clr(&self, score: f64, energy: EnergyState) -> Judgment {
        let verdict = if score > self.full_threshold && energy.is_ok() {
            Verdict::Full
        } else {
            Verdict::Wait
        };
        Judgment {
            model: Model::Clr,
            verdict,
            score,
        }
    }

    pub fn classify_cm(
        &self,
        score: f64,
        energy: EnergyState,
        trend: TrendPosition,
        momentum: MomentumHistory,
    ) -> Judgment {
        let verdict = match self.cm_policy {
            CmPolicy::Binary => {
                if trend == TrendPosition::Above && energy.is_ok() && score > 0.0 {
                    Verdict::Full
                } else {
                    Verdict::Exit
                }
            }
            CmPolicy::Graduated => {
                if score < 0.0 {
                    Verdict::Sell
                } else if trend == TrendPosition::Below {
                    Verdict::Exit
                } else if energy == EnergyState::Dead && momentum.is_declining() {
                    Verdict::Reduce
                } else {
                    Verdict::Keep
                }
            }
        };
        Judgment {
            model: Model::Cm,
            verdict,
            score,
        }
    }
}
