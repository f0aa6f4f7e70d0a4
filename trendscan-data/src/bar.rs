use crate::{error::DataError, interval::Interval, symbol::Symbol};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalised OHLCV [`Bar`] model.
///
/// Only the close is mandatory. Providers that omit open, high or low leave them as `None`, and
/// an absent volume is recorded as zero.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Deserialize, Serialize)]
pub struct Bar {
    pub time: DateTime<Utc>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

impl Bar {
    pub fn ohlcv(time: DateTime<Utc>, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            time,
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close,
            volume,
        }
    }

    pub fn close_only(time: DateTime<Utc>, close: f64) -> Self {
        Self {
            time,
            open: None,
            high: None,
            low: None,
            close,
            volume: 0.0,
        }
    }

    pub fn has_ohlc(&self) -> bool {
        self.open.is_some() && self.high.is_some() && self.low.is_some()
    }
}

/// Ordered sequence of [`Bar`]s for one [`Symbol`] sampled at one [`Interval`].
///
/// Construction guarantees timestamps are strictly increasing and every close is finite.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct BarSeries {
    symbol: Symbol,
    interval: Interval,
    bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new(symbol: Symbol, interval: Interval, bars: Vec<Bar>) -> Result<Self, DataError> {
        if let Some(bar) = bars.iter().find(|bar| !bar.close.is_finite()) {
            return Err(DataError::InvalidSeries(format!(
                "non-finite close {} at {}",
                bar.close, bar.time
            )));
        }

        if let Some(pair) = bars.windows(2).find(|pair| pair[0].time >= pair[1].time) {
            return Err(DataError::InvalidSeries(format!(
                "timestamps not strictly increasing: {} then {}",
                pair[0].time, pair[1].time
            )));
        }

        Ok(Self {
            symbol,
            interval,
            bars,
        })
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    /// Returns true if every [`Bar`] carries an open, high and low.
    pub fn has_full_ohlc(&self) -> bool {
        self.bars.iter().all(Bar::has_ohlc)
    }

    pub fn into_bars(self) -> Vec<Bar> {
        self.bars
    }
}
