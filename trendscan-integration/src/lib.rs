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

//! # Trendscan-Integration
//! Low-level framework for talking to the Http APIs Trendscan depends on.
//!
//! Market data providers and notification sinks are both modelled as a [`RestRequest`] executed
//! by a configurable [`RestClient`]:
//! * a [`BuildStrategy`] adds any mandatory headers before the request is built.
//! * a [`HttpParser`] deserialises the success response, and upon failure the API error.
//!
//! [`RestRequest`]: protocol::http::rest::RestRequest
//! [`RestClient`]: protocol::http::rest::client::RestClient
//! [`BuildStrategy`]: protocol::http::BuildStrategy
//! [`HttpParser`]: protocol::http::HttpParser

/// All [`Error`](std::error::Error)s generated in Trendscan-Integration.
pub mod error;

/// Http protocol abstractions.
pub mod protocol;

/// Utilities to assist deserialisation.
pub mod de;

pub use error::SocketError;
