#![allow(dead_code)]

use bandtrader::domain::backtest::{BacktestConfig, OverlapPolicy};
use bandtrader::domain::error::BacktesterError;
use bandtrader::domain::execution::RiskParams;
use bandtrader::domain::indicator::{EmaMode, IndicatorParams};
pub use bandtrader::domain::ohlcv::{PriceBar, PriceSeries};
use bandtrader::domain::signal::SignalParams;
use bandtrader::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_series(
        &self,
        ticker: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, BacktesterError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(BacktesterError::Data {
                reason: reason.clone(),
            });
        }
        let Some(bars) = self.data.get(ticker) else {
            return Err(BacktesterError::NoData {
                ticker: ticker.to_string(),
            });
        };
        let bars = bars
            .iter()
            .filter(|b| start_date.is_none_or(|s| b.date >= s))
            .filter(|b| end_date.is_none_or(|e| b.date <= e))
            .cloned()
            .collect();
        PriceSeries::new(ticker, bars)
    }

    fn list_tickers(&self) -> Result<Vec<String>, BacktesterError> {
        let mut tickers: Vec<String> = self.data.keys().cloned().collect();
        tickers.sort();
        Ok(tickers)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, BacktesterError> {
        match self.data.get(ticker) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.date).min().unwrap();
                let max = bars.iter().map(|b| b.date).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Bars from a close path: each open is the previous close, high/low pad
/// the body by 0.1.
pub fn bars_from_closes(start: NaiveDate, closes: &[f64]) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            PriceBar {
                date: start + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 0.1,
                low: open.min(close) - 0.1,
                close,
            }
        })
        .collect()
}

/// Alternating moves: +up on odd bars, -down on even bars.
pub fn zigzag_closes(count: usize, start_price: f64, up: f64, down: f64) -> Vec<f64> {
    let mut closes = Vec::with_capacity(count);
    let mut price = start_price;
    for i in 0..count {
        if i > 0 {
            price += if i % 2 == 1 { up } else { -down };
        }
        closes.push(price);
    }
    closes
}

/// Drifts upward with shallow pullbacks. Every close sits above both short
/// EMAs and the 2-bar oscillator stays at ~83, so under `small_config` the
/// only signal is Long.
pub fn uptrend_bars(count: usize) -> Vec<PriceBar> {
    bars_from_closes(date(2024, 1, 1), &zigzag_closes(count, 100.0, 1.0, 0.2))
}

/// Downward counterpart of `uptrend_bars`: oscillator at ~17, only Short.
pub fn downtrend_bars(count: usize) -> Vec<PriceBar> {
    bars_from_closes(date(2024, 1, 1), &zigzag_closes(count, 100.0, 0.2, 1.0))
}

/// Constant closes: the oscillator sits at 100 so nothing ever signals.
pub fn flat_bars(count: usize, price: f64) -> Vec<PriceBar> {
    bars_from_closes(date(2024, 1, 1), &vec![price; count])
}

pub fn series(ticker: &str, bars: Vec<PriceBar>) -> PriceSeries {
    PriceSeries::new(ticker, bars).unwrap()
}

/// Short lookbacks and a wide band so small hand-built series produce signals.
pub fn small_config() -> BacktestConfig {
    BacktestConfig {
        initial_capital: 100_000.0,
        indicators: IndicatorParams {
            fast_span: 2,
            slow_span: 3,
            rsi_window: 2,
            ema_mode: EmaMode::Adjusted,
        },
        signals: SignalParams {
            lower_band: 10.0,
            upper_band: 90.0,
        },
        risk: RiskParams::default(),
        overlap: OverlapPolicy::Overlapping,
    }
}

pub fn tickers(list: &[&str]) -> Vec<String> {
    list.iter().map(|t| t.to_string()).collect()
}
