//! Ticker universe: parsing the configured list and loading each series.
//!
//! A ticker whose data cannot be fetched, or comes back empty, is recorded
//! as skipped and the remaining tickers proceed.

use crate::domain::error::BacktesterError;
use crate::domain::ohlcv::PriceSeries;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in ticker list")]
    EmptyToken,

    #[error("duplicate ticker: {0}")]
    DuplicateTicker(String),
}

pub fn parse_tickers(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut tickers = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let ticker = trimmed.to_uppercase();
        if !seen.insert(ticker.clone()) {
            return Err(UniverseError::DuplicateTicker(ticker));
        }
        tickers.push(ticker);
    }

    Ok(tickers)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedTicker {
    pub ticker: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    NoData,
    InsufficientBars { bars: usize, minimum: usize },
    FetchFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoData => write!(f, "no data"),
            SkipReason::InsufficientBars { bars, minimum } => {
                write!(f, "only {} bars, minimum {} required", bars, minimum)
            }
            SkipReason::FetchFailed(reason) => write!(f, "fetch failed: {}", reason),
        }
    }
}

/// Series that loaded successfully, in configured order, plus the skips.
#[derive(Debug, Clone, Default)]
pub struct LoadedUniverse {
    pub series: Vec<PriceSeries>,
    pub skipped: Vec<SkippedTicker>,
}

pub fn load_universe(
    data_port: &dyn DataPort,
    tickers: &[String],
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> LoadedUniverse {
    let mut loaded = LoadedUniverse::default();

    for ticker in tickers {
        let series = match data_port.fetch_series(ticker, start_date, end_date) {
            Ok(series) => series,
            Err(BacktesterError::NoData { .. }) => {
                tracing::warn!(ticker = %ticker, "skipping ticker (no data found)");
                loaded.skipped.push(SkippedTicker {
                    ticker: ticker.clone(),
                    reason: SkipReason::NoData,
                });
                continue;
            }
            Err(e) => {
                tracing::warn!(ticker = %ticker, error = %e, "skipping ticker");
                loaded.skipped.push(SkippedTicker {
                    ticker: ticker.clone(),
                    reason: SkipReason::FetchFailed(e.to_string()),
                });
                continue;
            }
        };

        if series.is_empty() {
            tracing::warn!(ticker = %ticker, "skipping ticker (no data found)");
            loaded.skipped.push(SkippedTicker {
                ticker: ticker.clone(),
                reason: SkipReason::NoData,
            });
            continue;
        }

        tracing::info!(
            ticker = %ticker,
            bars = series.len(),
            first = ?series.first_date(),
            last = ?series.last_date(),
            "loaded"
        );
        loaded.series.push(series);
    }

    loaded
}
