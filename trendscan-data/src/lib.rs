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

//! # Trendscan-Data
//! Normalised intraday market data for Trendscan.
//!
//! * [`BarSeries`](bar::BarSeries): ordered, validated OHLCV bars for one symbol at one interval.
//! * [`ColumnFrame`](frame::ColumnFrame): raw provider columns, normalised into a `BarSeries` at
//!   the provider boundary.
//! * [`BarAggregator`](aggregator::BarAggregator): resamples fine bars into coarser buckets.
//! * [`MarketDataProvider`](provider::MarketDataProvider): on-demand bar source, with a Yahoo
//!   Finance chart implementation and an in-memory implementation.

/// All [`Error`](std::error::Error)s generated in Trendscan-Data.
pub mod error;

/// [`Symbol`](symbol::Symbol) identifier of an equity in the scan universe.
pub mod symbol;

/// Sampling [`Interval`](interval::Interval) of a bar series, eg/ `15m`, `1h`.
pub mod interval;

/// Normalised [`Bar`](bar::Bar) & [`BarSeries`](bar::BarSeries) models.
pub mod bar;

/// Raw provider columns & schema normalisation.
pub mod frame;

/// Time-bucket resampling of a [`BarSeries`](bar::BarSeries).
pub mod aggregator;

/// Market data providers & fetch planning.
pub mod provider;
