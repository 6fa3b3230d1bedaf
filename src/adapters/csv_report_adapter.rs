//! CSV report adapter implementing ReportPort.
//!
//! Writes the ranked results table; an undefined win rate is an empty cell.

use std::path::Path;

use serde::Serialize;

use crate::domain::error::BacktesterError;
use crate::domain::metrics::{BacktestSummary, ResultRow};
use crate::ports::report_port::ReportPort;

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    rank: usize,
    ticker: &'a str,
    return_pct: f64,
    trades: usize,
    win_rate_pct: Option<f64>,
    final_equity: f64,
}

impl<'a> CsvRow<'a> {
    fn from_row(rank: usize, row: &'a ResultRow) -> Self {
        CsvRow {
            rank,
            ticker: &row.ticker,
            return_pct: round2(row.total_return_pct),
            trades: row.trade_count,
            win_rate_pct: row.win_rate_pct.map(round2),
            final_equity: round2(row.final_equity),
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[derive(Debug, Default)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        CsvReportAdapter
    }

    pub fn write_to<W: std::io::Write>(
        &self,
        summary: &BacktestSummary,
        top: usize,
        writer: W,
    ) -> Result<(), BacktesterError> {
        let mut wtr = csv::Writer::from_writer(writer);
        for (i, row) in summary.top(top).iter().enumerate() {
            wtr.serialize(CsvRow::from_row(i + 1, row))?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        summary: &BacktestSummary,
        top: usize,
        output_path: &Path,
    ) -> Result<(), BacktesterError> {
        let file = std::fs::File::create(output_path)?;
        self.write_to(summary, top, file)
    }
}
