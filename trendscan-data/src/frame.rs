use crate::{
    bar::{Bar, BarSeries},
    error::DataError,
    interval::Interval,
    symbol::Symbol,
};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Raw provider payload prior to normalisation: a timestamp column plus named value columns.
///
/// Providers do not agree on column naming (`Close`, `close`, `adjclose`, ...), so a
/// [`ColumnFrame`] keeps whatever the provider sent until [`normalise`](Self::normalise)
/// resolves it into a [`BarSeries`].
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct ColumnFrame {
    pub timestamps: Vec<DateTime<Utc>>,
    pub columns: IndexMap<String, Vec<Option<f64>>>,
}

impl ColumnFrame {
    pub fn new(
        timestamps: Vec<DateTime<Utc>>,
        columns: IndexMap<String, Vec<Option<f64>>>,
    ) -> Self {
        Self {
            timestamps,
            columns,
        }
    }

    pub fn with_column<S>(mut self, name: S, values: Vec<Option<f64>>) -> Self
    where
        S: Into<String>,
    {
        self.columns.insert(name.into(), values);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty() || self.columns.is_empty()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.keys().cloned().collect()
    }

    /// Resolve the Close column.
    ///
    /// An exact `close` match (any case) wins. Otherwise the single column whose name contains
    /// `close` is adopted; zero or several such columns is a [`DataError::MissingCloseField`].
    fn close_column(&self) -> Result<&[Option<f64>], DataError> {
        if let Some(values) = self.find_exact("close") {
            return Ok(values);
        }

        let mut candidates = self
            .columns
            .iter()
            .filter(|(name, _)| name.to_ascii_lowercase().contains("close"));

        match (candidates.next(), candidates.next()) {
            (Some((name, values)), None) => {
                debug!(column = %name, "adopting column as close");
                Ok(values)
            }
            _ => Err(DataError::MissingCloseField {
                columns: self.column_names(),
            }),
        }
    }

    fn find_exact(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|(column, _)| column.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.as_slice())
    }

    /// Normalise this frame into a [`BarSeries`].
    ///
    /// Rows with a missing or non-finite close are dropped. A frame with nothing left is
    /// [`DataError::NoData`].
    pub fn normalise(&self, symbol: Symbol, interval: Interval) -> Result<BarSeries, DataError> {
        if self.is_empty() {
            return Err(DataError::NoData);
        }

        let rows = self.timestamps.len();
        if let Some((name, values)) = self.columns.iter().find(|(_, values)| values.len() != rows) {
            return Err(DataError::InvalidSeries(format!(
                "column {name} has {} values for {rows} timestamps",
                values.len()
            )));
        }

        let close = self.close_column()?;
        let open = self.find_exact("open");
        let high = self.find_exact("high");
        let low = self.find_exact("low");
        let volume = self.find_exact("volume");

        let value = |column: Option<&[Option<f64>]>, index: usize| {
            column
                .and_then(|values| values[index])
                .filter(|value| value.is_finite())
        };

        let bars = self
            .timestamps
            .iter()
            .enumerate()
            .filter_map(|(index, time)| {
                let close = close[index].filter(|close| close.is_finite())?;
                Some(Bar {
                    time: *time,
                    open: value(open, index),
                    high: value(high, index),
                    low: value(low, index),
                    close,
                    volume: value(volume, index).unwrap_or_default(),
                })
            })
            .collect::<Vec<_>>();

        if bars.is_empty() {
            return Err(DataError::NoData);
        }

        let dropped = rows - bars.len();
        if dropped > 0 {
            debug!(%symbol, %interval, dropped, "dropped rows without a close");
        }

        BarSeries::new(symbol, interval, bars)
    }
}

impl From<&BarSeries> for ColumnFrame {
    fn from(series: &BarSeries) -> Self {
        let bars = series.bars();
        let column = |select: fn(&Bar) -> Option<f64>| bars.iter().map(select).collect();

        Self::new(bars.iter().map(|bar| bar.time).collect(), IndexMap::new())
            .with_column("Open", column(|bar| bar.open))
            .with_column("High", column(|bar| bar.high))
            .with_column("Low", column(|bar| bar.low))
            .with_column("Close", column(|bar| Some(bar.close)))
            .with_column("Volume", column(|bar| Some(bar.volume)))
    }
}
