//! The scoring components.
//!
//! Each component is a small immutable value built from `EngineConfig`.
//! Leaf components read a price or return series; the compositor and the
//! classifier combine their outputs; the regime selector stands apart and
//! only annotates which model is currently favored.

pub mod anchor;
pub mod compositor;
pub mod drag;
pub mod energy;
pub mod judgment;
pub mod regime;
pub mod trend;

pub use anchor::{AnchorSpec, BaselineFormula};
pub use compositor::{CompositeRule, ScoreCompositor};
pub use drag::{DragEstimate, VolatilityDragEstimator};
pub use energy::{EnergyOscillator, EnergyReading};
pub use judgment::{CmPolicy, JudgmentClassifier, MomentumHistory};
pub use regime::{RegimeSelector, RegimeState};
pub use trend::{TrendGauge, TrendReading};
