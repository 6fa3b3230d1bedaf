//! Performance metrics and cross-instrument summary.

use super::account::{Account, EquityPoint};
use super::backtest::InstrumentResult;
use super::universe::SkippedTicker;

pub const DEFAULT_TOP_ROWS: usize = 20;

/// Per-instrument reporting row.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub ticker: String,
    pub total_return_pct: f64,
    pub trade_count: usize,
    /// None when the instrument took no trades.
    pub win_rate_pct: Option<f64>,
    pub final_equity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeStats {
    pub trades_won: usize,
    pub trades_lost: usize,
    pub trades_breakeven: usize,
    pub profit_factor: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub max_drawdown: f64,
    pub avg_holding_bars: f64,
}

impl TradeStats {
    pub fn compute(account: &Account) -> Self {
        let mut trades_won = 0usize;
        let mut trades_lost = 0usize;
        let mut trades_breakeven = 0usize;
        let mut total_wins = 0.0_f64;
        let mut total_losses = 0.0_f64;
        let mut largest_win = 0.0_f64;
        let mut largest_loss = 0.0_f64;
        let mut total_holding = 0usize;

        for trade in &account.trades {
            let pnl = trade.pnl;
            if trade.is_win() {
                trades_won += 1;
                total_wins += pnl;
                largest_win = largest_win.max(pnl);
            } else if trade.is_loss() {
                trades_lost += 1;
                total_losses += pnl.abs();
                largest_loss = largest_loss.max(pnl.abs());
            } else {
                trades_breakeven += 1;
            }
            total_holding += trade.holding_bars();
        }

        let total_trades = account.trades.len();

        let profit_factor = if total_losses > 0.0 {
            total_wins / total_losses
        } else if total_wins > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        let avg_win = if trades_won > 0 {
            total_wins / trades_won as f64
        } else {
            0.0
        };

        let avg_loss = if trades_lost > 0 {
            total_losses / trades_lost as f64
        } else {
            0.0
        };

        let avg_holding_bars = if total_trades > 0 {
            total_holding as f64 / total_trades as f64
        } else {
            0.0
        };

        TradeStats {
            trades_won,
            trades_lost,
            trades_breakeven,
            profit_factor,
            avg_win,
            avg_loss,
            largest_win,
            largest_loss,
            max_drawdown: compute_drawdown(account.initial_capital, &account.equity_curve),
            avg_holding_bars,
        }
    }
}

/// Largest peak-to-trough fall of the per-trade equity curve, as a fraction.
///
/// The curve is walked in settlement order, which is entry order. With
/// overlapping positions a later entry can exit first, so point dates need
/// not be monotonic and this is not a calendar-ordered drawdown.
fn compute_drawdown(initial_capital: f64, equity_curve: &[EquityPoint]) -> f64 {
    let mut peak = initial_capital;
    let mut max_dd = 0.0_f64;

    for point in equity_curve {
        if point.equity > peak {
            peak = point.equity;
        } else if peak > 0.0 {
            max_dd = max_dd.max((peak - point.equity) / peak);
        }
    }

    max_dd
}

/// Results across the universe. Rows are sorted by total return, best first;
/// `results` keeps processing order.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestSummary {
    pub initial_capital: f64,
    pub rows: Vec<ResultRow>,
    pub results: Vec<InstrumentResult>,
    pub skipped: Vec<SkippedTicker>,
}

impl BacktestSummary {
    pub fn new(
        initial_capital: f64,
        results: Vec<InstrumentResult>,
        skipped: Vec<SkippedTicker>,
    ) -> Self {
        let mut rows: Vec<ResultRow> = results.iter().map(InstrumentResult::to_row).collect();
        rows.sort_by(|a, b| b.total_return_pct.total_cmp(&a.total_return_pct));

        BacktestSummary {
            initial_capital,
            rows,
            results,
            skipped,
        }
    }

    pub fn top(&self, n: usize) -> &[ResultRow] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Unweighted mean of per-instrument returns.
    pub fn mean_return_pct(&self) -> Option<f64> {
        if self.rows.is_empty() {
            return None;
        }
        Some(self.rows.iter().map(|r| r.total_return_pct).sum::<f64>() / self.rows.len() as f64)
    }

    /// Sum of final equity over processed instruments, each run with its own
    /// initial capital.
    pub fn combined_final_equity(&self) -> f64 {
        self.rows.iter().map(|r| r.final_equity).sum()
    }

    pub fn combined_initial_capital(&self) -> f64 {
        self.initial_capital * self.rows.len() as f64
    }

    pub fn total_trades(&self) -> usize {
        self.rows.iter().map(|r| r.trade_count).sum()
    }

    /// Final equity of the last instrument processed.
    pub fn last_instrument_equity(&self) -> Option<f64> {
        self.results.last().map(|r| r.account.equity)
    }
}
