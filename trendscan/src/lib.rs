#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::cognitive_complexity,
    unused_crate_dependencies,
    unused_extern_crates,
    clippy::unused_self,
    clippy::useless_let_if_seq,
    missing_debug_implementations,
    rust_2018_idioms,
    rust_2024_compatibility
)]

//! # Trendscan
//! Scans a fixed equity universe across several intraday intervals and reports the symbols whose
//! price sits near a rising moving average.
//!
//! A scan run flows through a small set of de-coupled components:
//! * **Data**: a [`MarketDataProvider`](trendscan_data::provider::MarketDataProvider) serves
//!   bars per symbol & interval. Intervals the provider cannot serve natively (eg/ `45m`) are
//!   fetched at a finer native interval and resampled by the
//!   [`BarAggregator`](trendscan_data::aggregator::BarAggregator).
//! * **Signal**: the [`SignalEngine`](trendscan_ta::signal::SignalEngine) computes the moving
//!   average, its slope and the distance of price from it, and flags candidates.
//! * **Scan**: the [`ScanOrchestrator`](scan::ScanOrchestrator) runs every (interval, symbol)
//!   unit, tolerating per-unit failures, and accumulates candidates in a deterministic order.
//! * **Report**: the [`Reporter`](report::Reporter) renders candidates as a CSV table and
//!   delivers it to a [`NotificationSink`](report::sink::NotificationSink).

use crate::{
    error::TrendscanError,
    report::{DeliveryOutcome, Reporter, sink::NotificationSink, table::print_summary},
    scan::{ScanOrchestrator, ScanOutcome},
};
use tracing::info;
use trendscan_data::{interval::Interval, provider::MarketDataProvider, symbol::Symbol};

/// Scan configuration, loaded from JSON and the environment.
pub mod config;

/// All [`Error`](std::error::Error)s generated in Trendscan.
pub mod error;

/// Default `tracing` subscribers.
pub mod logging;

/// [`ScanOrchestrator`] & scan results.
pub mod scan;

/// Candidate table rendering & delivery.
pub mod report;

/// Run one full scan: analyse every unit, print the summary and deliver the report.
///
/// Per-unit failures are logged and tolerated. Only a failed delivery is returned as an error.
pub async fn run<Provider, Sink>(
    orchestrator: &ScanOrchestrator<Provider>,
    reporter: &Reporter<Sink>,
    symbols: &[Symbol],
    intervals: &[Interval],
) -> Result<(ScanOutcome, DeliveryOutcome), TrendscanError>
where
    Provider: MarketDataProvider + Sync,
    Sink: NotificationSink + Sync,
{
    let outcome = orchestrator.scan(symbols, intervals).await;

    info!(
        analysed = outcome.analysed,
        failed = outcome.failures.len(),
        candidates = outcome.result.len(),
        "scan complete"
    );

    print_summary(&outcome.result);

    let delivery = reporter.report(&outcome.result).await?;
    Ok((outcome, delivery))
}
