//! Per-bar trading signal from an indicator row.
//!
//! Long needs close above both EMAs, Short below both; either also needs the
//! oscillator strictly inside the neutral band.

use std::fmt;

use crate::domain::execution::Direction;
use crate::domain::indicator::frame::{FrameRow, IndicatorFrame};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Signal {
    Long,
    Short,
    #[default]
    Flat,
}

impl Signal {
    pub fn direction(self) -> Option<Direction> {
        match self {
            Signal::Long => Some(Direction::Long),
            Signal::Short => Some(Direction::Short),
            Signal::Flat => None,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Long => write!(f, "LONG"),
            Signal::Short => write!(f, "SHORT"),
            Signal::Flat => write!(f, "FLAT"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalParams {
    pub lower_band: f64,
    pub upper_band: f64,
}

impl Default for SignalParams {
    fn default() -> Self {
        SignalParams {
            lower_band: 40.0,
            upper_band: 60.0,
        }
    }
}

pub fn derive_signal(row: &FrameRow, params: &SignalParams) -> Signal {
    let in_band = row.oscillator > params.lower_band && row.oscillator < params.upper_band;
    if !in_band {
        return Signal::Flat;
    }

    if row.close > row.fast_ema && row.close > row.slow_ema {
        Signal::Long
    } else if row.close < row.fast_ema && row.close < row.slow_ema {
        Signal::Short
    } else {
        Signal::Flat
    }
}

pub fn derive_signals(frame: &IndicatorFrame, params: &SignalParams) -> Vec<Signal> {
    frame
        .rows
        .iter()
        .map(|row| derive_signal(row, params))
        .collect()
}
