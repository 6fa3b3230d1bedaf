//! Configuration validation.
//!
//! Validates all config fields before a backtest runs. Defaults used here
//! match the ones `cli::build_backtest_config` applies.

use crate::domain::backtest::OverlapPolicy;
use crate::domain::error::BacktesterError;
use crate::domain::indicator::EmaMode;
use crate::domain::universe::parse_tickers;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), BacktesterError> {
    validate_run_config(config)?;
    validate_tickers(config)?;
    Ok(())
}

/// Everything in `[backtest]` and `[report]` except the ticker list, which a
/// command-line override may replace.
pub fn validate_run_config(config: &dyn ConfigPort) -> Result<(), BacktesterError> {
    validate_initial_capital(config)?;
    validate_dates(config)?;
    validate_overlap(config)?;
    validate_top(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), BacktesterError> {
    validate_spans(config)?;
    validate_ema_mode(config)?;
    validate_bands(config)?;
    validate_fraction(config, "risk_fraction", 0.01)?;
    validate_fraction(config, "stop_loss", 0.02)?;
    validate_fraction(config, "take_profit", 0.04)?;
    Ok(())
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), BacktesterError> {
    let value = config.get_double("backtest", "initial_capital", 100_000.0);
    if !(value.is_finite() && value > 0.0) {
        return Err(BacktesterError::config_invalid(
            "backtest",
            "initial_capital",
            "initial_capital must be positive",
        ));
    }
    Ok(())
}

pub(crate) fn parse_optional_date(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<Option<NaiveDate>, BacktesterError> {
    match config.get_string("backtest", key) {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                BacktesterError::config_invalid(
                    "backtest",
                    key,
                    format!("invalid {} format, expected YYYY-MM-DD", key),
                )
            }),
    }
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), BacktesterError> {
    let start_date = parse_optional_date(config, "start_date")?;
    let end_date = parse_optional_date(config, "end_date")?;

    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start >= end {
            return Err(BacktesterError::config_invalid(
                "backtest",
                "start_date",
                "start_date must be before end_date",
            ));
        }
    }
    Ok(())
}

fn validate_tickers(config: &dyn ConfigPort) -> Result<(), BacktesterError> {
    match config.get_string("backtest", "tickers") {
        Some(s) if !s.trim().is_empty() => {
            parse_tickers(&s)?;
            Ok(())
        }
        _ => Err(BacktesterError::config_missing("backtest", "tickers")),
    }
}

fn validate_overlap(config: &dyn ConfigPort) -> Result<(), BacktesterError> {
    if let Some(s) = config.get_string("backtest", "overlap") {
        s.parse::<OverlapPolicy>()
            .map_err(|reason| BacktesterError::config_invalid("backtest", "overlap", reason))?;
    }
    Ok(())
}

fn validate_top(config: &dyn ConfigPort) -> Result<(), BacktesterError> {
    let value = config.get_int("report", "top", 20);
    if value < 1 {
        return Err(BacktesterError::config_invalid(
            "report",
            "top",
            "top must be at least 1",
        ));
    }
    Ok(())
}

fn validate_spans(config: &dyn ConfigPort) -> Result<(), BacktesterError> {
    let fast = config.get_int("strategy", "fast_span", 50);
    let slow = config.get_int("strategy", "slow_span", 200);
    let window = config.get_int("strategy", "rsi_window", 14);

    if fast < 1 {
        return Err(BacktesterError::config_invalid(
            "strategy",
            "fast_span",
            "fast_span must be at least 1",
        ));
    }
    if slow <= fast {
        return Err(BacktesterError::config_invalid(
            "strategy",
            "slow_span",
            "slow_span must be greater than fast_span",
        ));
    }
    if window < 1 {
        return Err(BacktesterError::config_invalid(
            "strategy",
            "rsi_window",
            "rsi_window must be at least 1",
        ));
    }
    Ok(())
}

fn validate_ema_mode(config: &dyn ConfigPort) -> Result<(), BacktesterError> {
    if let Some(s) = config.get_string("strategy", "ema_mode") {
        s.parse::<EmaMode>()
            .map_err(|reason| BacktesterError::config_invalid("strategy", "ema_mode", reason))?;
    }
    Ok(())
}

fn validate_bands(config: &dyn ConfigPort) -> Result<(), BacktesterError> {
    let lower = config.get_double("strategy", "lower_band", 40.0);
    let upper = config.get_double("strategy", "upper_band", 60.0);

    if !(0.0..=100.0).contains(&lower) || !(0.0..=100.0).contains(&upper) {
        return Err(BacktesterError::config_invalid(
            "strategy",
            "lower_band",
            "oscillator bands must be between 0 and 100",
        ));
    }
    if lower >= upper {
        return Err(BacktesterError::config_invalid(
            "strategy",
            "lower_band",
            "lower_band must be below upper_band",
        ));
    }
    Ok(())
}

fn validate_fraction(config: &dyn ConfigPort, key: &str, default: f64) -> Result<(), BacktesterError> {
    let value = config.get_double("strategy", key, default);
    if !(value > 0.0 && value < 1.0) {
        return Err(BacktesterError::config_invalid(
            "strategy",
            key,
            format!("{} must be between 0 and 1 (exclusive)", key),
        ));
    }
    Ok(())
}
