//! Closed trade record.

use chrono::NaiveDate;
use std::fmt;

use crate::domain::execution::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
    /// No bracket touched before the series ran out; closed at the last close.
    EndOfData,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::StopLoss => write!(f, "stop_loss"),
            ExitReason::TakeProfit => write!(f, "take_profit"),
            ExitReason::EndOfData => write!(f, "end_of_data"),
        }
    }
}

/// A fully resolved trade. Built once by the execution step, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub direction: Direction,
    pub entry_index: usize,
    pub exit_index: usize,
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub entry_price: f64,
    pub size: i64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub exit_price: f64,
    pub exit_reason: ExitReason,
    pub return_frac: f64,
    pub pnl: f64,
}

impl Trade {
    pub fn is_win(&self) -> bool {
        self.pnl > 0.0
    }

    pub fn is_loss(&self) -> bool {
        self.pnl < 0.0
    }

    /// Bars between entry and exit; 0 when the entry bar itself exits.
    pub fn holding_bars(&self) -> usize {
        self.exit_index - self.entry_index
    }
}
