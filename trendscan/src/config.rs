use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;
use tracing::info;
use trendscan_data::{interval::Interval, provider::yahoo::YAHOO_BASE_URL, symbol::Symbol};
use trendscan_ta::signal::SignalConfig;

use crate::report::telegram::TELEGRAM_BASE_URL;

/// Environment variable holding the config file path, used when no path argument is given.
pub const CONFIG_PATH_ENV: &str = "TRENDSCAN_CONFIG";
pub const TELEGRAM_BOT_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";
pub const TELEGRAM_CHAT_ID_ENV: &str = "TELEGRAM_CHAT_ID";

/// Nifty 50 constituents, the default scan universe.
pub const NIFTY_50: [&str; 50] = [
    "ADANIENT.NS", "ADANIPORTS.NS", "APOLLOHOSP.NS", "ASIANPAINT.NS", "AXISBANK.NS",
    "BAJAJ-AUTO.NS", "BAJFINANCE.NS", "BAJAJFINSV.NS", "BEL.NS", "BPCL.NS",
    "BHARTIARTL.NS", "BRITANNIA.NS", "CIPLA.NS", "COALINDIA.NS", "DIVISLAB.NS",
    "DRREDDY.NS", "EICHERMOT.NS", "GRASIM.NS", "HCLTECH.NS", "HDFCBANK.NS",
    "HDFCLIFE.NS", "HEROMOTOCO.NS", "HINDALCO.NS", "HINDUNILVR.NS", "ICICIBANK.NS",
    "ITC.NS", "INDUSINDBK.NS", "INFY.NS", "JSWSTEEL.NS", "KOTAKBANK.NS",
    "LT.NS", "M&M.NS", "MARUTI.NS", "NESTLEIND.NS", "NTPC.NS",
    "ONGC.NS", "POWERGRID.NS", "RELIANCE.NS", "SBILIFE.NS", "SBIN.NS",
    "SUNPHARMA.NS", "TCS.NS", "TATACONSUM.NS", "TATAMOTORS.NS", "TATASTEEL.NS",
    "TECHM.NS", "TITAN.NS", "ULTRACEMCO.NS", "UPL.NS", "WIPRO.NS",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {error}")]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("failed to parse {path}: {error}")]
    Parse {
        path: PathBuf,
        error: serde_json::Error,
    },

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid<S>(field: &'static str, reason: S) -> Self
    where
        S: Into<String>,
    {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Telegram bot credentials. Only ever sourced from the environment.
#[derive(Clone, PartialEq, Eq)]
pub struct TelegramCredentials {
    pub bot_token: String,
    pub chat_id: String,
}

impl std::fmt::Debug for TelegramCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramCredentials")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

/// Configuration of a scan run.
///
/// ### Example
/// ```json
/// {
///   "near_pct": 0.5,
///   "symbols": ["RELIANCE.NS", "INFY.NS"],
///   "intervals": ["15m", "45m"],
///   "window_len": 44,
///   "concurrency": 4
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScanConfig {
    #[serde(flatten)]
    pub signal: SignalConfig,

    #[serde(default = "default_symbols")]
    pub symbols: Vec<Symbol>,

    #[serde(default = "default_intervals")]
    pub intervals: Vec<Interval>,

    /// Days of history requested per fetch.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    /// Maximum number of units analysed concurrently within an interval.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Defaults to `{window_len}ma_candidates.csv`.
    #[serde(default)]
    pub report_filename: Option<String>,

    /// Directory reports are written to when no Telegram credentials are configured.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_yahoo_base_url")]
    pub yahoo_base_url: String,

    #[serde(default = "default_telegram_base_url")]
    pub telegram_base_url: String,

    #[serde(skip)]
    pub telegram: Option<TelegramCredentials>,
}

fn default_symbols() -> Vec<Symbol> {
    NIFTY_50.into_iter().map(Symbol::from).collect()
}

fn default_intervals() -> Vec<Interval> {
    vec![Interval::M15, Interval::M30, Interval::M45, Interval::M60]
}

fn default_lookback_days() -> u32 {
    7
}

fn default_concurrency() -> usize {
    1
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_yahoo_base_url() -> String {
    YAHOO_BASE_URL.to_string()
}

fn default_telegram_base_url() -> String {
    TELEGRAM_BASE_URL.to_string()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            signal: SignalConfig::default(),
            symbols: default_symbols(),
            intervals: default_intervals(),
            lookback_days: default_lookback_days(),
            concurrency: default_concurrency(),
            request_timeout_secs: default_request_timeout_secs(),
            report_filename: None,
            output_dir: default_output_dir(),
            yahoo_base_url: default_yahoo_base_url(),
            telegram_base_url: default_telegram_base_url(),
            telegram: None,
        }
    }
}

impl ScanConfig {
    /// Load a [`ScanConfig`] from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|error| ConfigError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Resolve the run configuration.
    ///
    /// The config file path is `path` if provided, else [`CONFIG_PATH_ENV`]; with neither, every
    /// field takes its default. Telegram credentials are read from [`TELEGRAM_BOT_TOKEN_ENV`] &
    /// [`TELEGRAM_CHAT_ID_ENV`]. The result is validated.
    pub fn resolve(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));

        let mut config = match &path {
            Some(path) => {
                info!(path = %path.display(), "loading scan config");
                Self::load(path)?
            }
            None => {
                info!("no scan config provided, using defaults");
                Self::default()
            }
        };

        config.telegram = telegram_credentials_from_env();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let SignalConfig {
            window_len,
            slope_lookback,
            near_pct,
            min_rows,
        } = self.signal;

        if window_len == 0 {
            return Err(ConfigError::invalid("window_len", "must be positive"));
        }
        if slope_lookback < 2 {
            return Err(ConfigError::invalid(
                "slope_lookback",
                format!("{slope_lookback} cannot measure a slope, must be at least 2"),
            ));
        }
        if min_rows == 0 {
            return Err(ConfigError::invalid("min_rows", "must be positive"));
        }
        if !near_pct.is_finite() || near_pct < 0.0 {
            return Err(ConfigError::invalid(
                "near_pct",
                format!("{near_pct} must be a non-negative percentage"),
            ));
        }
        if self.lookback_days == 0 {
            return Err(ConfigError::invalid("lookback_days", "must be positive"));
        }
        if self.concurrency == 0 {
            return Err(ConfigError::invalid("concurrency", "must be positive"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::invalid("request_timeout_secs", "must be positive"));
        }
        if let Some(filename) = &self.report_filename
            && filename.trim().is_empty()
        {
            return Err(ConfigError::invalid("report_filename", "must not be empty"));
        }

        for (field, base_url) in [
            ("yahoo_base_url", &self.yahoo_base_url),
            ("telegram_base_url", &self.telegram_base_url),
        ] {
            url::Url::parse(base_url)
                .map_err(|error| ConfigError::invalid(field, format!("{base_url}: {error}")))?;
        }

        Ok(())
    }

    pub fn lookback(&self) -> TimeDelta {
        TimeDelta::days(i64::from(self.lookback_days))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn report_filename(&self) -> String {
        self.report_filename
            .clone()
            .unwrap_or_else(|| format!("{}ma_candidates.csv", self.signal.window_len))
    }
}

fn telegram_credentials_from_env() -> Option<TelegramCredentials> {
    let bot_token = std::env::var(TELEGRAM_BOT_TOKEN_ENV).ok()?;
    let chat_id = std::env::var(TELEGRAM_CHAT_ID_ENV).ok()?;

    if bot_token.trim().is_empty() || chat_id.trim().is_empty() {
        return None;
    }

    Some(TelegramCredentials { bot_token, chat_id })
}
