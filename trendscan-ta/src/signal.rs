use crate::{
    error::AnalysisError,
    indicators::simple_moving_average,
    trend::{average_slope, is_near_rising_average, percent_deviation},
};
use serde::{Deserialize, Serialize};
use trendscan_data::{bar::BarSeries, interval::Interval, symbol::Symbol};

pub const DEFAULT_WINDOW_LEN: usize = 44;
pub const DEFAULT_SLOPE_LOOKBACK: usize = 6;
pub const DEFAULT_NEAR_PCT: f64 = 1.0;
pub const DEFAULT_MIN_ROWS: usize = 10;

/// Parameters of the moving average proximity signal.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize, Serialize)]
pub struct SignalConfig {
    /// Moving average window length.
    #[serde(default = "default_window_len")]
    pub window_len: usize,
    /// Number of trailing moving average values the slope is measured over.
    #[serde(default = "default_slope_lookback")]
    pub slope_lookback: usize,
    /// Half-width of the proximity band around the moving average, in percent.
    #[serde(default = "default_near_pct")]
    pub near_pct: f64,
    /// Series with fewer rows are rejected before any averaging.
    #[serde(default = "default_min_rows")]
    pub min_rows: usize,
}

fn default_window_len() -> usize {
    DEFAULT_WINDOW_LEN
}

fn default_slope_lookback() -> usize {
    DEFAULT_SLOPE_LOOKBACK
}

fn default_near_pct() -> f64 {
    DEFAULT_NEAR_PCT
}

fn default_min_rows() -> usize {
    DEFAULT_MIN_ROWS
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            window_len: DEFAULT_WINDOW_LEN,
            slope_lookback: DEFAULT_SLOPE_LOOKBACK,
            near_pct: DEFAULT_NEAR_PCT,
            min_rows: DEFAULT_MIN_ROWS,
        }
    }
}

/// Snapshot of the moving average signal for one symbol at one interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolSignal {
    pub symbol: Symbol,
    pub interval: Interval,
    /// Rows in the analysed series, after any resampling.
    pub rows: usize,
    pub last_close: f64,
    pub prev_close: Option<f64>,
    pub last_ma: f64,
    pub prev_ma: Option<f64>,
    /// Trailing moving average values the slope was measured over, oldest first.
    pub recent_ma: Vec<f64>,
    pub slope: Option<f64>,
    pub diff_pct: Option<f64>,
    pub is_candidate: bool,
}

/// Computes a [`SymbolSignal`] from a [`BarSeries`].
#[derive(Debug, Copy, Clone, Default)]
pub struct SignalEngine {
    config: SignalConfig,
}

impl SignalEngine {
    pub fn new(config: SignalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    /// Analyse the provided [`BarSeries`].
    ///
    /// Missing history never fails the analysis on its own: `prev_close`, `prev_ma`, `slope`
    /// and `diff_pct` are simply `None`, and only `slope` & `diff_pct` gate candidacy.
    pub fn analyze(&self, series: &BarSeries) -> Result<SymbolSignal, AnalysisError> {
        let SignalConfig {
            window_len,
            slope_lookback,
            near_pct,
            min_rows,
        } = self.config;

        let closes = series.closes();
        let rows = closes.len();

        let Some(&last_close) = closes.last() else {
            return Err(AnalysisError::NoData);
        };

        if rows < min_rows {
            return Err(AnalysisError::InsufficientRows { rows, min_rows });
        }

        let moving_average = simple_moving_average(&closes, window_len);
        let Some(&last_ma) = moving_average.last() else {
            return Err(AnalysisError::InsufficientMaHistory { rows, window_len });
        };

        let prev_close = rows.checked_sub(2).map(|index| closes[index]);
        let prev_ma = moving_average
            .len()
            .checked_sub(2)
            .map(|index| moving_average[index]);

        let recent_ma =
            moving_average[moving_average.len().saturating_sub(slope_lookback)..].to_vec();
        let slope = average_slope(&recent_ma);
        let diff_pct = percent_deviation(last_close, last_ma);

        Ok(SymbolSignal {
            symbol: series.symbol().clone(),
            interval: series.interval(),
            rows,
            last_close,
            prev_close,
            last_ma,
            prev_ma,
            recent_ma,
            slope,
            diff_pct,
            is_candidate: is_near_rising_average(slope, diff_pct, near_pct),
        })
    }
}
