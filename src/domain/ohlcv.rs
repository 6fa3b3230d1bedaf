//! Daily price bars and per-instrument price series.

use crate::domain::error::BacktesterError;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl PriceBar {
    /// low <= open, close <= high
    pub fn is_consistent(&self) -> bool {
        self.low <= self.open.min(self.close) && self.open.max(self.close) <= self.high
    }

    fn has_positive_prices(&self) -> bool {
        [self.open, self.high, self.low, self.close]
            .iter()
            .all(|p| p.is_finite() && *p > 0.0)
    }
}

/// Ascending daily bars for one ticker. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub ticker: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(ticker: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, BacktesterError> {
        let ticker = ticker.into();

        for (i, bar) in bars.iter().enumerate() {
            if !bar.has_positive_prices() {
                return Err(BacktesterError::InvalidSeries {
                    ticker,
                    reason: format!("non-positive price on {}", bar.date),
                });
            }
            if !bar.is_consistent() {
                return Err(BacktesterError::InvalidSeries {
                    ticker,
                    reason: format!("bar on {} is outside its high/low range", bar.date),
                });
            }
            if i > 0 && bars[i - 1].date >= bar.date {
                return Err(BacktesterError::InvalidSeries {
                    ticker,
                    reason: format!("dates not ascending at {}", bar.date),
                });
            }
        }

        Ok(Self { ticker, bars })
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }
}
