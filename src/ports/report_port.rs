//! Report generation port trait.

use crate::domain::error::BacktesterError;
use crate::domain::metrics::BacktestSummary;
use std::path::Path;

/// Port for writing backtest results.
pub trait ReportPort {
    /// Write the best `top` rows of the summary.
    fn write(
        &self,
        summary: &BacktestSummary,
        top: usize,
        output_path: &Path,
    ) -> Result<(), BacktesterError>;
}
