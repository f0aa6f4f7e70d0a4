use crate::{bar::BarSeries, error::DataError, interval::Interval, symbol::Symbol};
use async_trait::async_trait;
use chrono::TimeDelta;

/// [`InMemoryProvider`](memory::InMemoryProvider) serving pre-built frames, for tests & demos.
pub mod memory;

/// [`YahooChart`](yahoo::YahooChart) provider backed by the Yahoo Finance chart API.
pub mod yahoo;

/// On-demand source of [`BarSeries`], queried per symbol, interval and lookback window.
#[async_trait]
pub trait MarketDataProvider {
    /// [`Interval`]s this provider can serve without resampling.
    fn native_intervals(&self) -> &[Interval];

    /// Fetch the bars of `symbol` sampled at the native `interval`, covering `lookback` up to
    /// now.
    async fn fetch(
        &self,
        symbol: &Symbol,
        interval: Interval,
        lookback: TimeDelta,
    ) -> Result<BarSeries, DataError>;
}

/// How to obtain bars for a requested [`Interval`] from a [`MarketDataProvider`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FetchPlan {
    /// Native interval to request from the provider.
    pub fetch: Interval,
    /// Bucket to resample the fetched bars into, if the requested interval is not native.
    pub aggregate: Option<Interval>,
}

impl FetchPlan {
    /// Resolve the plan for `requested` given the provider's `native` intervals.
    ///
    /// A native interval is fetched directly. Otherwise the largest native interval that evenly
    /// divides `requested` is fetched and aggregated, eg/ `45m` is served from `15m` bars.
    pub fn resolve(requested: Interval, native: &[Interval]) -> Result<Self, DataError> {
        if let Some(direct) = native
            .iter()
            .find(|interval| **interval == requested)
            .or_else(|| native.iter().find(|interval| interval.same_duration(&requested)))
        {
            return Ok(Self {
                fetch: *direct,
                aggregate: None,
            });
        }

        native
            .iter()
            .filter(|interval| interval.divides(&requested))
            .max_by_key(|interval| interval.total_minutes())
            .map(|fetch| Self {
                fetch: *fetch,
                aggregate: Some(requested),
            })
            .ok_or(DataError::UnsupportedInterval(requested))
    }
}
