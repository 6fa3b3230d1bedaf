//! Domain error types.

use crate::domain::universe::UniverseError;

/// Top-level error type for bandtrader.
#[derive(Debug, thiserror::Error)]
pub enum BacktesterError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Universe(#[from] UniverseError),

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data for {ticker}")]
    NoData { ticker: String },

    #[error("invalid price series for {ticker}: {reason}")]
    InvalidSeries { ticker: String, reason: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BacktesterError {
    pub(crate) fn config_invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        BacktesterError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn config_missing(section: &str, key: &str) -> Self {
        BacktesterError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }
    }
}

impl From<&BacktesterError> for std::process::ExitCode {
    fn from(err: &BacktesterError) -> Self {
        let code: u8 = match err {
            BacktesterError::Io(_) | BacktesterError::Csv(_) => 1,
            BacktesterError::ConfigParse { .. }
            | BacktesterError::ConfigMissing { .. }
            | BacktesterError::ConfigInvalid { .. }
            | BacktesterError::Universe(_) => 2,
            BacktesterError::Data { .. } | BacktesterError::InvalidSeries { .. } => 3,
            BacktesterError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
