//! INI file configuration adapter.
//!
//! Section and key names are case-insensitive; values are returned trimmed.

use crate::domain::error::BacktesterError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, BacktesterError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config.load(path).map_err(|reason| BacktesterError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, BacktesterError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| BacktesterError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    const SAMPLE: &str = r#"
[data]
dir = ./prices

[backtest]
tickers = AAPL, MSFT, NVDA
initial_capital = 250000.5
overlap = sequential

[strategy]
fast_span = 20
stop_loss = 0.015

[report]
top = 10
"#;

    #[test]
    fn from_string_parses_sections() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_string("data", "dir"), Some("./prices".to_string()));
        assert_eq!(
            adapter.get_string("backtest", "tickers"),
            Some("AAPL, MSFT, NVDA".to_string())
        );
        assert_eq!(
            adapter.get_double("backtest", "initial_capital", 0.0),
            250000.5
        );
        assert_eq!(adapter.get_int("strategy", "fast_span", 50), 20);
        assert_eq!(adapter.get_double("strategy", "stop_loss", 0.02), 0.015);
        assert_eq!(adapter.get_int("report", "top", 20), 10);
    }

    #[test]
    fn keys_are_case_insensitive() {
        let adapter = FileConfigAdapter::from_string("[Strategy]\nFast_Span = 12\n").unwrap();
        assert_eq!(adapter.get_int("strategy", "fast_span", 0), 12);
    }

    #[test]
    fn missing_keys_fall_back() {
        let adapter = FileConfigAdapter::from_string("[strategy]\n").unwrap();
        assert_eq!(adapter.get_string("strategy", "ema_mode"), None);
        assert_eq!(adapter.get_string("nowhere", "key"), None);
        assert_eq!(adapter.get_int("strategy", "rsi_window", 14), 14);
        assert_eq!(adapter.get_double("strategy", "take_profit", 0.04), 0.04);
    }

    #[test]
    fn non_numeric_values_fall_back() {
        let adapter =
            FileConfigAdapter::from_string("[strategy]\nrsi_window = abc\nstop_loss = x\n")
                .unwrap();
        assert_eq!(adapter.get_int("strategy", "rsi_window", 14), 14);
        assert_eq!(adapter.get_double("strategy", "stop_loss", 0.02), 0.02);
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[report]\noutput = results.csv\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("report", "output"),
            Some("results.csv".to_string())
        );
    }

    #[test]
    fn from_file_missing_is_config_parse_error() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(matches!(result, Err(BacktesterError::ConfigParse { .. })));
    }
}
