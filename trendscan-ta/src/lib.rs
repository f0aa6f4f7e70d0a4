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

//! Technical analysis for Trendscan.
//!
//! This crate computes a trailing moving average over a bar series, derives its trend slope and
//! the distance of the last close from it, and classifies the series as a candidate when price
//! sits near a rising average.

/// All [`Error`](std::error::Error)s generated in Trendscan-TA.
pub mod error;

pub mod indicators;

/// Slope & deviation helpers.
pub mod trend;

/// [`SignalEngine`](signal::SignalEngine) producing a [`SymbolSignal`](signal::SymbolSignal).
pub mod signal;
