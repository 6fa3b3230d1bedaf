//! CSV file data adapter.
//!
//! One file per ticker, `<base>/<TICKER>.csv`, with a header row naming at
//! least `date,open,high,low,close`. Extra columns (volume, adj close) are
//! ignored. Rows with a blank or `nan` price are treated as absent days.

use crate::domain::error::BacktesterError;
use crate::domain::ohlcv::{PriceBar, PriceSeries};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

struct Columns {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }

    fn read_bars(&self, ticker: &str) -> Result<Vec<PriceBar>, BacktesterError> {
        let path = self.csv_path(ticker);
        if !path.exists() {
            return Err(BacktesterError::NoData {
                ticker: ticker.to_string(),
            });
        }

        let content = fs::read_to_string(&path).map_err(|e| BacktesterError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let columns = locate_columns(rdr.headers()?)?;
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| BacktesterError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let date_str = record.get(columns.date).ok_or_else(|| BacktesterError::Data {
                reason: "missing date column".into(),
            })?;
            let date = parse_date(date_str)?;

            let prices = [columns.open, columns.high, columns.low, columns.close]
                .iter()
                .map(|&idx| parse_price(record.get(idx)))
                .collect::<Result<Vec<Option<f64>>, BacktesterError>>()?;

            let [Some(open), Some(high), Some(low), Some(close)] = prices[..] else {
                continue;
            };

            bars.push(PriceBar {
                date,
                open,
                high,
                low,
                close,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

fn locate_columns(headers: &csv::StringRecord) -> Result<Columns, BacktesterError> {
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| BacktesterError::Data {
                reason: format!("missing {} column", name),
            })
    };

    Ok(Columns {
        date: find("date")?,
        open: find("open")?,
        high: find("high")?,
        low: find("low")?,
        close: find("close")?,
    })
}

/// Accepts `YYYY-MM-DD`, ignoring any time suffix.
fn parse_date(value: &str) -> Result<NaiveDate, BacktesterError> {
    let day = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| BacktesterError::Data {
        reason: format!("invalid date '{}': {}", value, e),
    })
}

fn parse_price(value: Option<&str>) -> Result<Option<f64>, BacktesterError> {
    match value {
        None => Ok(None),
        Some(s) if s.is_empty() || s.eq_ignore_ascii_case("nan") => Ok(None),
        Some(s) => s.parse::<f64>().map(Some).map_err(|e| BacktesterError::Data {
            reason: format!("invalid price value '{}': {}", s, e),
        }),
    }
}

impl DataPort for CsvAdapter {
    fn fetch_series(
        &self,
        ticker: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, BacktesterError> {
        let bars = self
            .read_bars(ticker)?
            .into_iter()
            .filter(|b| start_date.is_none_or(|s| b.date >= s))
            .filter(|b| end_date.is_none_or(|e| b.date <= e))
            .collect();

        PriceSeries::new(ticker, bars)
    }

    fn list_tickers(&self) -> Result<Vec<String>, BacktesterError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| BacktesterError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut tickers = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| BacktesterError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(ticker) = name_str.strip_suffix(".csv") {
                tickers.push(ticker.to_string());
            }
        }

        tickers.sort();
        Ok(tickers)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, BacktesterError> {
        let bars = match self.read_bars(ticker) {
            Ok(bars) => bars,
            Err(BacktesterError::NoData { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date, bars.len()))),
            _ => Ok(None),
        }
    }
}
