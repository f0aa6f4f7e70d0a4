use chrono::TimeDelta;
use derive_more::Constructor;
use futures::{StreamExt, stream};
use thiserror::Error;
use tracing::{Instrument, info, info_span, warn};
use trendscan_data::{
    aggregator::BarAggregator,
    error::DataError,
    interval::Interval,
    provider::{FetchPlan, MarketDataProvider},
    symbol::Symbol,
};
use trendscan_ta::{
    error::AnalysisError,
    signal::{SignalConfig, SignalEngine, SymbolSignal},
};

/// Reason a single (symbol, interval) unit of work failed.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum UnitError {
    #[error("{0}")]
    Data(#[from] DataError),

    #[error("{0}")]
    Analysis(#[from] AnalysisError),
}

/// Diagnostic record of a failed unit of work.
#[derive(Debug, Clone, Eq, PartialEq, Constructor)]
pub struct UnitFailure {
    pub symbol: Symbol,
    pub interval: Interval,
    pub reason: UnitError,
}

/// Candidate [`SymbolSignal`]s of one scan, in interval-major then universe order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScanResult {
    candidates: Vec<SymbolSignal>,
}

impl ScanResult {
    pub fn push(&mut self, signal: SymbolSignal) {
        self.candidates.push(signal);
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymbolSignal> {
        self.candidates.iter()
    }

    pub fn candidates(&self) -> &[SymbolSignal] {
        &self.candidates
    }
}

impl FromIterator<SymbolSignal> for ScanResult {
    fn from_iter<Iter: IntoIterator<Item = SymbolSignal>>(iter: Iter) -> Self {
        Self {
            candidates: iter.into_iter().collect(),
        }
    }
}

/// Everything a scan produced: candidates, per-unit failures and the number of units that
/// produced a signal.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScanOutcome {
    pub result: ScanResult,
    pub failures: Vec<UnitFailure>,
    pub analysed: usize,
}

/// Runs every (interval, symbol) unit of a scan against a [`MarketDataProvider`].
///
/// Units within an interval are evaluated through a bounded, order-preserving stream, so the
/// [`ScanResult`] order never depends on completion order.
#[derive(Debug)]
pub struct ScanOrchestrator<Provider> {
    provider: Provider,
    engine: SignalEngine,
    lookback: TimeDelta,
    concurrency: usize,
}

impl<Provider> ScanOrchestrator<Provider> {
    pub fn new(provider: Provider, signal_config: SignalConfig, lookback: TimeDelta) -> Self {
        Self {
            provider,
            engine: SignalEngine::new(signal_config),
            lookback,
            concurrency: 1,
        }
    }

    /// Evaluate up to `concurrency` units at once. Zero is treated as one.
    pub fn with_concurrency(self, concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
            ..self
        }
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    pub fn engine(&self) -> &SignalEngine {
        &self.engine
    }
}

impl<Provider> ScanOrchestrator<Provider>
where
    Provider: MarketDataProvider + Sync,
{
    /// Scan every symbol at every interval. Unit failures are recorded and never abort the scan.
    pub async fn scan(&self, symbols: &[Symbol], intervals: &[Interval]) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();

        for &interval in intervals {
            let units = stream::iter(symbols)
                .map(|symbol| self.run_unit(symbol, interval))
                .buffered(self.concurrency)
                .collect::<Vec<_>>()
                .instrument(info_span!("scan_interval", %interval))
                .await;

            for unit in units {
                match unit {
                    Ok(signal) => {
                        outcome.analysed += 1;
                        if signal.is_candidate {
                            outcome.result.push(signal);
                        }
                    }
                    Err(failure) => outcome.failures.push(failure),
                }
            }
        }

        outcome
    }

    async fn run_unit(
        &self,
        symbol: &Symbol,
        interval: Interval,
    ) -> Result<SymbolSignal, UnitFailure> {
        match self.analyze_unit(symbol, interval).await {
            Ok(signal) => {
                info!(
                    %symbol,
                    %interval,
                    rows = signal.rows,
                    close = signal.last_close,
                    prev_close = ?signal.prev_close,
                    ma = signal.last_ma,
                    prev_ma = ?signal.prev_ma,
                    diff_pct = ?signal.diff_pct,
                    slope = ?signal.slope,
                    candidate = signal.is_candidate,
                    "analysed"
                );
                Ok(signal)
            }
            Err(reason) => {
                warn!(%symbol, %interval, %reason, "skipped");
                Err(UnitFailure::new(symbol.clone(), interval, reason))
            }
        }
    }

    /// Fetch, optionally resample, and analyse one symbol at one interval.
    ///
    /// The returned [`SymbolSignal`] carries the requested `interval`, not the fetched one.
    pub async fn analyze_unit(
        &self,
        symbol: &Symbol,
        interval: Interval,
    ) -> Result<SymbolSignal, UnitError> {
        let plan = FetchPlan::resolve(interval, self.provider.native_intervals())?;

        let fetched = self
            .provider
            .fetch(symbol, plan.fetch, self.lookback)
            .await?;

        let series = match plan.aggregate {
            Some(target) => BarAggregator::new(target)?.aggregate(&fetched)?,
            None => fetched,
        };

        let mut signal = self.engine.analyze(&series)?;
        signal.interval = interval;
        Ok(signal)
    }
}
