//! Historical price data port trait.

use crate::domain::error::BacktesterError;
use crate::domain::ohlcv::PriceSeries;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily bars for `ticker`, ascending, optionally clipped to a date range.
    fn fetch_series(
        &self,
        ticker: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, BacktesterError>;

    fn list_tickers(&self) -> Result<Vec<String>, BacktesterError>;

    /// (first date, last date, bar count), or None when the ticker has no bars.
    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, BacktesterError>;
}
