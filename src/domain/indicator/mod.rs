//! Technical indicators feeding the signal rules.
//!
//! - [`ema`]: exponential moving average of close
//! - [`rsi`]: bounded relative-strength oscillator over simple-mean gains/losses
//! - [`frame`]: the per-bar table joining both, trimmed to the oscillator warmup

pub mod ema;
pub mod frame;
pub mod rsi;

use std::fmt;
use std::str::FromStr;

/// EMA weighting convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmaMode {
    /// Weighted running mean over every observation so far.
    #[default]
    Adjusted,
    /// Plain recurrence seeded with the first value.
    Recursive,
}

impl FromStr for EmaMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "adjusted" => Ok(EmaMode::Adjusted),
            "recursive" => Ok(EmaMode::Recursive),
            other => Err(format!("unknown ema mode '{}' (expected adjusted or recursive)", other)),
        }
    }
}

impl fmt::Display for EmaMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmaMode::Adjusted => write!(f, "adjusted"),
            EmaMode::Recursive => write!(f, "recursive"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorParams {
    pub fast_span: usize,
    pub slow_span: usize,
    pub rsi_window: usize,
    pub ema_mode: EmaMode,
}

impl IndicatorParams {
    /// Bars needed before the first frame row exists.
    pub fn min_bars(&self) -> usize {
        self.rsi_window + 1
    }
}

impl Default for IndicatorParams {
    fn default() -> Self {
        IndicatorParams {
            fast_span: 50,
            slow_span: 200,
            rsi_window: 14,
            ema_mode: EmaMode::Adjusted,
        }
    }
}

impl fmt::Display for IndicatorParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EMA({}), EMA({}), RSI({}) [{}]",
            self.fast_span, self.slow_span, self.rsi_window, self.ema_mode
        )
    }
}
