//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::table_report::{format_table, format_trade_stats};
use crate::domain::backtest::{run_universe, BacktestConfig, OverlapPolicy};
use crate::domain::config_validation::{
    parse_optional_date, validate_backtest_config, validate_run_config, validate_strategy_config,
};
use crate::domain::error::BacktesterError;
use crate::domain::execution::RiskParams;
use crate::domain::indicator::{EmaMode, IndicatorParams};
use crate::domain::metrics::{BacktestSummary, DEFAULT_TOP_ROWS};
use crate::domain::signal::SignalParams;
use crate::domain::universe::{load_universe, parse_tickers};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "bandtrader", about = "EMA trend / RSI band signal backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest over the configured tickers
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Directory of <TICKER>.csv files (overrides [data] dir)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
        /// Backtest a single ticker instead of the configured list
        #[arg(long)]
        ticker: Option<String>,
        /// Write the ranked results as CSV (overrides [report] output)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Number of rows to report (overrides [report] top)
        #[arg(long)]
        top: Option<usize>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show data range for ticker(s)
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
    /// List tickers available in the data directory
    ListTickers {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
}

/// Where the results go after a run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub top: usize,
    pub output: Option<PathBuf>,
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Backtest {
            config,
            data_dir,
            ticker,
            output,
            top,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config, ticker.as_deref())
            } else {
                run_backtest(&config, data_dir, ticker.as_deref(), output, top)
            }
        }
        Command::Validate { config } => run_validate(&config),
        Command::Info {
            config,
            ticker,
            data_dir,
        } => run_info(&config, ticker.as_deref(), data_dir),
        Command::ListTickers { config, data_dir } => run_list_tickers(&config, data_dir),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, BacktesterError> {
    tracing::info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, BacktesterError> {
    let ema_mode = match adapter.get_string("strategy", "ema_mode") {
        Some(s) => s
            .parse::<EmaMode>()
            .map_err(|reason| BacktesterError::config_invalid("strategy", "ema_mode", reason))?,
        None => EmaMode::default(),
    };
    let overlap = match adapter.get_string("backtest", "overlap") {
        Some(s) => s
            .parse::<OverlapPolicy>()
            .map_err(|reason| BacktesterError::config_invalid("backtest", "overlap", reason))?,
        None => OverlapPolicy::default(),
    };

    let initial_capital = adapter.get_double("backtest", "initial_capital", 100_000.0);
    if !(initial_capital.is_finite() && initial_capital > 0.0) {
        return Err(BacktesterError::config_invalid(
            "backtest",
            "initial_capital",
            "initial_capital must be positive",
        ));
    }

    Ok(BacktestConfig {
        initial_capital,
        indicators: IndicatorParams {
            fast_span: read_span(adapter, "fast_span", 50)?,
            slow_span: read_span(adapter, "slow_span", 200)?,
            rsi_window: read_span(adapter, "rsi_window", 14)?,
            ema_mode,
        },
        signals: SignalParams {
            lower_band: adapter.get_double("strategy", "lower_band", 40.0),
            upper_band: adapter.get_double("strategy", "upper_band", 60.0),
        },
        risk: RiskParams {
            risk_fraction: read_fraction(adapter, "risk_fraction", 0.01)?,
            stop_loss_fraction: read_fraction(adapter, "stop_loss", 0.02)?,
            take_profit_fraction: read_fraction(adapter, "take_profit", 0.04)?,
        },
        overlap,
    })
}

fn read_span(adapter: &dyn ConfigPort, key: &str, default: i64) -> Result<usize, BacktesterError> {
    let value = adapter.get_int("strategy", key, default);
    usize::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| BacktesterError::config_invalid("strategy", key, "must be a positive integer"))
}

fn read_fraction(adapter: &dyn ConfigPort, key: &str, default: f64) -> Result<f64, BacktesterError> {
    let value = adapter.get_double("strategy", key, default);
    if !(value > 0.0 && value < 1.0) {
        return Err(BacktesterError::config_invalid(
            "strategy",
            key,
            format!("{} must be between 0 and 1 (exclusive)", key),
        ));
    }
    Ok(value)
}

pub fn resolve_tickers(
    ticker_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<Vec<String>, BacktesterError> {
    if let Some(t) = ticker_override {
        return Ok(parse_tickers(t)?);
    }

    match config.get_string("backtest", "tickers") {
        Some(s) if !s.trim().is_empty() => Ok(parse_tickers(&s)?),
        _ => Err(BacktesterError::config_missing("backtest", "tickers")),
    }
}

pub fn resolve_data_dir(dir_override: Option<PathBuf>, config: &dyn ConfigPort) -> PathBuf {
    dir_override
        .or_else(|| config.get_string("data", "dir").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("data"))
}

pub fn resolve_report_options(
    top_override: Option<usize>,
    output_override: Option<PathBuf>,
    config: &dyn ConfigPort,
) -> ReportOptions {
    let configured_top = config.get_int("report", "top", DEFAULT_TOP_ROWS as i64);
    ReportOptions {
        top: top_override
            .or_else(|| usize::try_from(configured_top).ok())
            .filter(|t| *t > 0)
            .unwrap_or(DEFAULT_TOP_ROWS),
        output: output_override.or_else(|| {
            config
                .get_string("report", "output")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
        }),
    }
}

fn date_range(
    config: &dyn ConfigPort,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>), BacktesterError> {
    Ok((
        parse_optional_date(config, "start_date")?,
        parse_optional_date(config, "end_date")?,
    ))
}

pub fn run_backtest(
    config_path: &Path,
    data_dir: Option<PathBuf>,
    ticker_override: Option<&str>,
    output_override: Option<PathBuf>,
    top_override: Option<usize>,
) -> Result<ExitCode, BacktesterError> {
    // Stage 1: Load and validate config
    let adapter = load_config(config_path)?;
    validate_strategy_config(&adapter)?;
    match ticker_override {
        Some(_) => validate_run_config(&adapter)?,
        None => validate_backtest_config(&adapter)?,
    }

    let bt_config = build_backtest_config(&adapter)?;
    let tickers = resolve_tickers(ticker_override, &adapter)?;
    let (start_date, end_date) = date_range(&adapter)?;
    let report = resolve_report_options(top_override, output_override, &adapter);

    // Stage 2: Data source
    let data_dir = resolve_data_dir(data_dir, &adapter);
    tracing::info!(dir = %data_dir.display(), "reading price data");
    let data_port = CsvAdapter::new(data_dir);

    // Stage 3: Run and report
    let summary = run_backtest_pipeline(&data_port, &bt_config, &tickers, start_date, end_date)?;

    print!("{}", format_table(&summary, report.top));
    if let [single] = summary.results.as_slice() {
        println!();
        print!("{}", format_trade_stats(single));
    }

    if let Some(output) = &report.output {
        CsvReportAdapter::new().write(&summary, report.top, output)?;
        tracing::info!(path = %output.display(), "results written");
    }

    if summary.rows.is_empty() {
        return Err(BacktesterError::NoData {
            ticker: "all tickers".to_string(),
        });
    }

    Ok(ExitCode::SUCCESS)
}

/// Load every ticker through `data_port` and backtest them in order.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    bt_config: &BacktestConfig,
    tickers: &[String],
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<BacktestSummary, BacktesterError> {
    tracing::info!(tickers = tickers.len(), "loading universe");
    let loaded = load_universe(data_port, tickers, start_date, end_date);

    tracing::info!(
        instruments = loaded.series.len(),
        indicators = %bt_config.indicators,
        overlap = %bt_config.overlap,
        "running backtest"
    );
    let mut summary = run_universe(&loaded.series, bt_config);

    let mut skipped = loaded.skipped;
    skipped.append(&mut summary.skipped);
    summary.skipped = skipped;

    if let Some(equity) = summary.last_instrument_equity() {
        tracing::debug!(equity, "final equity of last instrument processed");
    }

    Ok(summary)
}

pub fn run_dry_run(
    config_path: &Path,
    ticker_override: Option<&str>,
) -> Result<ExitCode, BacktesterError> {
    let adapter = load_config(config_path)?;
    validate_strategy_config(&adapter)?;
    match ticker_override {
        Some(_) => validate_run_config(&adapter)?,
        None => validate_backtest_config(&adapter)?,
    }

    let bt_config = build_backtest_config(&adapter)?;
    let tickers = resolve_tickers(ticker_override, &adapter)?;
    let (start_date, end_date) = date_range(&adapter)?;

    println!("Configuration is valid.");
    println!("\nIndicators:   {}", bt_config.indicators);
    println!(
        "Signal band:  {} < RSI < {}",
        bt_config.signals.lower_band, bt_config.signals.upper_band
    );
    println!(
        "Risk:         {}% of equity, stop {}%, target {}%",
        bt_config.risk.risk_fraction * 100.0,
        bt_config.risk.stop_loss_fraction * 100.0,
        bt_config.risk.take_profit_fraction * 100.0
    );
    println!("Overlap:      {}", bt_config.overlap);
    println!("Capital:      {:.2}", bt_config.initial_capital);
    println!(
        "Range:        {} to {}",
        start_date.map_or("start".to_string(), |d| d.to_string()),
        end_date.map_or("end".to_string(), |d| d.to_string())
    );
    println!("Tickers:      {}", tickers.join(", "));

    Ok(ExitCode::SUCCESS)
}

pub fn run_validate(config_path: &Path) -> Result<ExitCode, BacktesterError> {
    let adapter = load_config(config_path)?;
    validate_backtest_config(&adapter)?;
    validate_strategy_config(&adapter)?;
    let bt_config = build_backtest_config(&adapter)?;

    println!("{}: valid", config_path.display());
    println!("  {}", bt_config.indicators);
    Ok(ExitCode::SUCCESS)
}

fn run_info(
    config_path: &Path,
    ticker_override: Option<&str>,
    data_dir: Option<PathBuf>,
) -> Result<ExitCode, BacktesterError> {
    let adapter = load_config(config_path)?;
    let tickers = resolve_tickers(ticker_override, &adapter)?;
    let data_port = CsvAdapter::new(resolve_data_dir(data_dir, &adapter));

    for t in &tickers {
        match data_port.get_data_range(t) {
            Ok(Some((min_date, max_date, count))) => {
                println!("{}: {} bars, {} to {}", t, count, min_date, max_date);
            }
            Ok(None) => println!("{}: no data found", t),
            Err(e) => eprintln!("error querying {}: {}", t, e),
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn run_list_tickers(
    config_path: &Path,
    data_dir: Option<PathBuf>,
) -> Result<ExitCode, BacktesterError> {
    let adapter = load_config(config_path)?;
    let data_port = CsvAdapter::new(resolve_data_dir(data_dir, &adapter));

    let tickers = data_port.list_tickers()?;
    if tickers.is_empty() {
        tracing::warn!("no tickers found");
    }
    for t in &tickers {
        println!("{}", t);
    }
    Ok(ExitCode::SUCCESS)
}
