//! Per-bar indicator table for one instrument.
//!
//! EMAs are computed over the whole series; rows whose oscillator is still in
//! warmup are then dropped from every column, so row 0 of the frame is the
//! first bar with a full oscillator window.

use chrono::NaiveDate;

use super::ema::calculate_ema;
use super::rsi::calculate_rsi;
use super::IndicatorParams;
use crate::domain::ohlcv::PriceSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct FrameRow {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub fast_ema: f64,
    pub slow_ema: f64,
    pub oscillator: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    pub ticker: String,
    pub rows: Vec<FrameRow>,
}

impl IndicatorFrame {
    pub fn build(series: &PriceSeries, params: &IndicatorParams) -> Self {
        let closes = series.closes();
        let fast = calculate_ema(&closes, params.fast_span, params.ema_mode);
        let slow = calculate_ema(&closes, params.slow_span, params.ema_mode);
        let rsi = calculate_rsi(&closes, params.rsi_window);

        let rows = series
            .bars()
            .iter()
            .enumerate()
            .filter_map(|(i, bar)| {
                let oscillator = rsi.get(i).copied().flatten()?;
                Some(FrameRow {
                    date: bar.date,
                    open: bar.open,
                    high: bar.high,
                    low: bar.low,
                    close: bar.close,
                    fast_ema: *fast.get(i)?,
                    slow_ema: *slow.get(i)?,
                    oscillator,
                })
            })
            .collect();

        IndicatorFrame {
            ticker: series.ticker.clone(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&FrameRow> {
        self.rows.get(index)
    }
}
