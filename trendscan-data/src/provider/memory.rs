use crate::{
    bar::BarSeries,
    error::DataError,
    frame::ColumnFrame,
    interval::Interval,
    provider::MarketDataProvider,
    symbol::Symbol,
};
use async_trait::async_trait;
use chrono::TimeDelta;
use parking_lot::Mutex;
use std::collections::HashMap;

/// [`MarketDataProvider`] serving pre-built [`ColumnFrame`]s keyed by symbol & interval.
///
/// Frames are normalised on every fetch, exactly as a remote provider's payload would be.
/// Unknown keys yield [`DataError::NoData`]. Every request is recorded so callers can assert on
/// which native intervals were fetched.
#[derive(Debug)]
pub struct InMemoryProvider {
    native: Vec<Interval>,
    responses: HashMap<(Symbol, Interval), Result<ColumnFrame, DataError>>,
    requests: Mutex<Vec<(Symbol, Interval)>>,
}

impl InMemoryProvider {
    pub fn new<Iter>(native: Iter) -> Self
    where
        Iter: IntoIterator<Item = Interval>,
    {
        Self {
            native: native.into_iter().collect(),
            responses: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_frame<S>(mut self, symbol: S, interval: Interval, frame: ColumnFrame) -> Self
    where
        S: Into<Symbol>,
    {
        self.responses.insert((symbol.into(), interval), Ok(frame));
        self
    }

    pub fn with_series(self, series: &BarSeries) -> Self {
        let symbol = series.symbol().clone();
        let interval = series.interval();
        self.with_frame(symbol, interval, ColumnFrame::from(series))
    }

    pub fn with_error<S>(mut self, symbol: S, interval: Interval, error: DataError) -> Self
    where
        S: Into<Symbol>,
    {
        self.responses.insert((symbol.into(), interval), Err(error));
        self
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<(Symbol, Interval)> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl MarketDataProvider for InMemoryProvider {
    fn native_intervals(&self) -> &[Interval] {
        &self.native
    }

    async fn fetch(
        &self,
        symbol: &Symbol,
        interval: Interval,
        _: TimeDelta,
    ) -> Result<BarSeries, DataError> {
        self.requests.lock().push((symbol.clone(), interval));

        match self.responses.get(&(symbol.clone(), interval)) {
            Some(Ok(frame)) => frame.normalise(symbol.clone(), interval),
            Some(Err(error)) => Err(error.clone()),
            None => Err(DataError::NoData),
        }
    }
}
