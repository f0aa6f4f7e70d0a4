use crate::{
    bar::{Bar, BarSeries},
    error::DataError,
    interval::Interval,
};
use chrono::{DateTime, Utc};
use itertools::Itertools;

/// Resamples a fine-grained [`BarSeries`] into coarser, fixed-duration buckets.
///
/// Buckets are left-closed and aligned to the Unix epoch rather than to the first bar, so the
/// same timestamp always lands in the same bucket. Each output [`Bar`] is labelled with its
/// bucket start:
/// - open: first open (or first close)
/// - high: max high (or max close)
/// - low: min low (or min close)
/// - close: last close
/// - volume: sum of volumes
///
/// The close-derived fields are used for the whole series whenever any input bar lacks an
/// open, high or low. Buckets without input bars are not emitted.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BarAggregator {
    target: Interval,
}

impl BarAggregator {
    pub fn new(target: Interval) -> Result<Self, DataError> {
        if target.total_minutes() == 0 {
            return Err(DataError::Resample(format!(
                "bucket duration must be positive: {target}"
            )));
        }
        Ok(Self { target })
    }

    pub fn target(&self) -> Interval {
        self.target
    }

    fn bucket_seconds(&self) -> i64 {
        self.target.duration().num_seconds()
    }

    fn bucket_start(&self, time: DateTime<Utc>) -> Result<DateTime<Utc>, DataError> {
        let seconds = self.bucket_seconds();
        let start = time.timestamp().div_euclid(seconds) * seconds;
        DateTime::<Utc>::from_timestamp(start, 0)
            .ok_or_else(|| DataError::Resample(format!("bucket start out of range for {time}")))
    }

    /// Aggregate the provided [`BarSeries`] into a [`BarSeries`] sampled at the target
    /// [`Interval`].
    pub fn aggregate(&self, series: &BarSeries) -> Result<BarSeries, DataError> {
        let source = series.interval();
        if !source.divides(&self.target) {
            return Err(DataError::Resample(format!(
                "cannot resample {source} bars into {} buckets",
                self.target
            )));
        }

        let full_ohlc = series.has_full_ohlc();

        let keyed = series
            .bars()
            .iter()
            .map(|bar| self.bucket_start(bar.time).map(|bucket| (bucket, bar)))
            .collect::<Result<Vec<_>, _>>()?;

        let bars = keyed
            .into_iter()
            .chunk_by(|(bucket, _)| *bucket)
            .into_iter()
            .map(|(bucket, group)| {
                aggregate_bucket(bucket, group.map(|(_, bar)| bar), full_ohlc)
            })
            .collect::<Vec<_>>();

        BarSeries::new(series.symbol().clone(), self.target, bars)
    }
}

fn aggregate_bucket<'a>(
    bucket: DateTime<Utc>,
    mut bars: impl Iterator<Item = &'a Bar>,
    full_ohlc: bool,
) -> Bar {
    let open_of = |bar: &Bar| if full_ohlc { bar.open.unwrap_or(bar.close) } else { bar.close };
    let high_of = |bar: &Bar| if full_ohlc { bar.high.unwrap_or(bar.close) } else { bar.close };
    let low_of = |bar: &Bar| if full_ohlc { bar.low.unwrap_or(bar.close) } else { bar.close };

    // chunk_by never yields an empty group
    let first = bars.next().copied().unwrap_or(Bar::close_only(bucket, f64::NAN));

    let init = Bar {
        time: bucket,
        open: Some(open_of(&first)),
        high: Some(high_of(&first)),
        low: Some(low_of(&first)),
        close: first.close,
        volume: first.volume,
    };

    bars.fold(init, |mut acc, bar| {
        acc.high = acc.high.map(|high| high.max(high_of(bar)));
        acc.low = acc.low.map(|low| low.min(low_of(bar)));
        acc.close = bar.close;
        acc.volume += bar.volume;
        acc
    })
}
