//! Energy: a fast crossover trigger on a double-smoothed momentum ratio.
//!
//! The oscillator is a TSI (spans 25 then 13 by default) and the trigger
//! fires when it sits above its own short EMA signal line. An undefined
//! oscillator at the last observation reads as `Dead`.

use serde::{Deserialize, Serialize};

use crate::domain::EnergyState;
use crate::indicators::{last_defined, Ema, EmaForm, Indicator, Tsi};

/// State plus the two values it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyReading {
    pub state: EnergyState,
    pub tsi: Option<f64>,
    pub signal: Option<f64>,
}

impl EnergyReading {
    fn dead() -> Self {
        Self {
            state: EnergyState::Dead,
            tsi: None,
            signal: None,
        }
    }

    /// Whether the reading came from a defined oscillator.
    pub fn is_defined(&self) -> bool {
        self.tsi.is_some() && self.signal.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct EnergyOscillator {
    oscillator: Tsi,
    signal_line: Ema,
}

impl EnergyOscillator {
    pub fn new(long_span: usize, short_span: usize, signal_span: usize, signal_form: EmaForm) -> Self {
        Self {
            oscillator: Tsi::new(long_span, short_span),
            signal_line: Ema::new(signal_span, signal_form),
        }
    }

    /// Full oscillator and signal-line series.
    pub fn series(&self, prices: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let tsi = self.oscillator.compute(prices);
        let signal = self.signal_line.compute(&tsi);
        (tsi, signal)
    }

    pub fn read(&self, prices: &[f64]) -> EnergyReading {
        if prices.len() <= self.oscillator.lookback() {
            return EnergyReading::dead();
        }
        let (tsi, signal) = self.series(prices);
        let (Some(tsi_last), Some(signal_last)) = (last_defined(&tsi), last_defined(&signal)) else {
            return EnergyReading::dead();
        };

        let state = if tsi_last > signal_last {
            EnergyState::Ok
        } else {
            EnergyState::Dead
        };
        EnergyReading {
            state,
            tsi: Some(tsi_last),
            signal: Some(signal_last),
        }
    }
}
