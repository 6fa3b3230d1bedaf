//! Backtest driver: one instrument at a time, then the whole universe.
//!
//! For each frame index `i >= 1` the signal computed at `i - 1` is acted on at
//! the open of bar `i`. Instruments never share state.

use std::fmt;
use std::str::FromStr;

use crate::domain::account::Account;
use crate::domain::execution::{simulate_trade, RiskParams};
use crate::domain::indicator::frame::IndicatorFrame;
use crate::domain::indicator::IndicatorParams;
use crate::domain::metrics::{BacktestSummary, ResultRow};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::{derive_signals, SignalParams};
use crate::domain::universe::{SkipReason, SkippedTicker};

/// Whether a new entry may be considered while an earlier trade is still open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapPolicy {
    /// Every bar is a candidate entry regardless of earlier trades' exits.
    #[default]
    Overlapping,
    /// The next candidate entry is the bar after the previous trade's exit.
    Sequential,
}

impl FromStr for OverlapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "overlapping" => Ok(OverlapPolicy::Overlapping),
            "sequential" => Ok(OverlapPolicy::Sequential),
            other => Err(format!(
                "unknown overlap policy '{}' (expected overlapping or sequential)",
                other
            )),
        }
    }
}

impl fmt::Display for OverlapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlapPolicy::Overlapping => write!(f, "overlapping"),
            OverlapPolicy::Sequential => write!(f, "sequential"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    pub indicators: IndicatorParams,
    pub signals: SignalParams,
    pub risk: RiskParams,
    pub overlap: OverlapPolicy,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_capital: 100_000.0,
            indicators: IndicatorParams::default(),
            signals: SignalParams::default(),
            risk: RiskParams::default(),
            overlap: OverlapPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentResult {
    pub ticker: String,
    pub account: Account,
    pub frame_len: usize,
}

impl InstrumentResult {
    pub fn to_row(&self) -> ResultRow {
        ResultRow {
            ticker: self.ticker.clone(),
            total_return_pct: self.account.total_return_pct(),
            trade_count: self.account.trade_count(),
            win_rate_pct: self.account.win_rate_pct(),
            final_equity: self.account.equity,
        }
    }
}

pub fn run_instrument(series: &PriceSeries, config: &BacktestConfig) -> InstrumentResult {
    let frame = IndicatorFrame::build(series, &config.indicators);
    let account = simulate(&frame, config);

    InstrumentResult {
        ticker: series.ticker.clone(),
        account,
        frame_len: frame.len(),
    }
}

/// Fold the entry scan over a prepared frame.
pub fn simulate(frame: &IndicatorFrame, config: &BacktestConfig) -> Account {
    let signals = derive_signals(frame, &config.signals);
    let mut account = Account::new(config.initial_capital);
    let mut next_entry = 1;

    for i in 1..frame.len() {
        if i < next_entry {
            continue;
        }
        let Some(direction) = signals[i - 1].direction() else {
            continue;
        };
        let Some(trade) = simulate_trade(frame, i, direction, account.equity, &config.risk) else {
            continue;
        };

        tracing::debug!(
            ticker = %frame.ticker,
            entry = %trade.entry_date,
            exit = %trade.exit_date,
            direction = ?trade.direction,
            size = trade.size,
            pnl = trade.pnl,
            reason = %trade.exit_reason,
            "trade closed"
        );

        if config.overlap == OverlapPolicy::Sequential {
            next_entry = trade.exit_index + 1;
        }
        account = account.settle(trade);
    }

    account
}

/// Run every series sequentially with a fresh account each.
pub fn run_universe(universe: &[PriceSeries], config: &BacktestConfig) -> BacktestSummary {
    let mut results = Vec::with_capacity(universe.len());
    let mut skipped = Vec::new();
    let minimum = config.indicators.min_bars();

    for series in universe {
        if series.is_empty() {
            skipped.push(SkippedTicker {
                ticker: series.ticker.clone(),
                reason: SkipReason::NoData,
            });
            continue;
        }

        let result = run_instrument(series, config);
        if result.frame_len == 0 {
            tracing::warn!(
                ticker = %series.ticker,
                bars = series.len(),
                minimum,
                "skipping ticker (insufficient bars)"
            );
            skipped.push(SkippedTicker {
                ticker: series.ticker.clone(),
                reason: SkipReason::InsufficientBars {
                    bars: series.len(),
                    minimum,
                },
            });
            continue;
        }

        tracing::info!(
            ticker = %result.ticker,
            trades = result.account.trade_count(),
            equity = result.account.equity,
            "backtest complete"
        );
        results.push(result);
    }

    BacktestSummary::new(config.initial_capital, results, skipped)
}
