//! Trade execution and fill simulation.
//!
//! Implements risk-based sizing, stop-loss/take-profit bracket placement and
//! the forward exit scan for a single trade.

use crate::domain::indicator::frame::IndicatorFrame;
use crate::domain::trade::{ExitReason, Trade};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// +1 for long, -1 for short.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
        }
    }
}

/// Risk parameters, all expressed as fractions (0.01 = 1%).
#[derive(Debug, Clone, PartialEq)]
pub struct RiskParams {
    pub risk_fraction: f64,
    pub stop_loss_fraction: f64,
    pub take_profit_fraction: f64,
}

impl Default for RiskParams {
    fn default() -> Self {
        RiskParams {
            risk_fraction: 0.01,
            stop_loss_fraction: 0.02,
            take_profit_fraction: 0.04,
        }
    }
}

/// Whole units such that a stop-out loses at most `risk_fraction` of equity.
///
/// size = floor(equity * risk_fraction / (entry_price * stop_loss_fraction))
pub fn position_size(equity: f64, entry_price: f64, params: &RiskParams) -> i64 {
    let size = (equity * params.risk_fraction / (entry_price * params.stop_loss_fraction)).floor();
    if size.is_finite() { size as i64 } else { 0 }
}

/// (stop_loss, take_profit) around the entry price.
pub fn bracket_prices(entry_price: f64, direction: Direction, params: &RiskParams) -> (f64, f64) {
    let dir = direction.sign();
    let stop = entry_price * (1.0 - params.stop_loss_fraction * dir);
    let target = entry_price * (1.0 + params.take_profit_fraction * dir);
    (stop, target)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitFill {
    pub index: usize,
    pub price: f64,
    pub reason: ExitReason,
}

/// Scan forward from `from_index` (inclusive) for the first bar touching
/// either bracket. Stop is checked before target on each bar. Falls back to
/// the last bar's close. Returns None only for an out-of-range start.
pub fn scan_exit(
    frame: &IndicatorFrame,
    from_index: usize,
    direction: Direction,
    stop: f64,
    target: f64,
) -> Option<ExitFill> {
    if from_index >= frame.len() {
        return None;
    }

    for (index, row) in frame.rows.iter().enumerate().skip(from_index) {
        let (stop_hit, target_hit) = match direction {
            Direction::Long => (row.low <= stop, row.high >= target),
            Direction::Short => (row.high >= stop, row.low <= target),
        };

        if stop_hit {
            return Some(ExitFill {
                index,
                price: stop,
                reason: ExitReason::StopLoss,
            });
        }
        if target_hit {
            return Some(ExitFill {
                index,
                price: target,
                reason: ExitReason::TakeProfit,
            });
        }
    }

    let last = frame.len() - 1;
    Some(ExitFill {
        index: last,
        price: frame.rows[last].close,
        reason: ExitReason::EndOfData,
    })
}

/// Open at the open of `entry_index` and resolve the trade.
///
/// Returns None when the sized position would be zero (or the index is out
/// of range); nothing is traded in that case.
pub fn simulate_trade(
    frame: &IndicatorFrame,
    entry_index: usize,
    direction: Direction,
    equity: f64,
    params: &RiskParams,
) -> Option<Trade> {
    let entry = frame.row(entry_index)?;
    let entry_price = entry.open;

    let size = position_size(equity, entry_price, params);
    if size <= 0 {
        return None;
    }

    let (stop_loss, take_profit) = bracket_prices(entry_price, direction, params);
    let fill = scan_exit(frame, entry_index, direction, stop_loss, take_profit)?;

    let return_frac = (fill.price - entry_price) / entry_price * direction.sign();
    let pnl = return_frac * entry_price * size as f64;

    Some(Trade {
        direction,
        entry_index,
        exit_index: fill.index,
        entry_date: entry.date,
        exit_date: frame.rows[fill.index].date,
        entry_price,
        size,
        stop_loss,
        take_profit,
        exit_price: fill.price,
        exit_reason: fill.reason,
        return_frac,
        pnl,
    })
}
