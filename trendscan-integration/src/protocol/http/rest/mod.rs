use serde::{Serialize, de::DeserializeOwned};
use std::{borrow::Cow, time::Duration};

/// [`client::RestClient`] executing [`RestRequest`]s against a single base Url.
pub mod client;

/// Timeout applied to a [`RestRequest`] that does not choose its own.
pub const DEFAULT_HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Description of one Http call: where it goes, what it carries and what it answers with.
///
/// Unused payload slots are typed as `()`.
pub trait RestRequest {
    /// Decoded body of a successful response.
    type Response: DeserializeOwned;

    type QueryParams: Serialize;

    /// JSON body type.
    type Body: Serialize;

    /// Path appended to the client base Url. May contain credentials, eg/ a bot token.
    fn path(&self) -> Cow<'static, str>;

    fn method() -> reqwest::Method;

    fn query_params(&self) -> Option<&Self::QueryParams> {
        None
    }

    fn body(&self) -> Option<&Self::Body> {
        None
    }

    /// Multipart form, eg/ a file upload. Takes precedence over [`body`](Self::body).
    ///
    /// A fresh [`reqwest::multipart::Form`] is built per call since forms are consumed on send.
    fn multipart(&self) -> Option<reqwest::multipart::Form> {
        None
    }

    /// Per request timeout.
    fn timeout(&self) -> Duration {
        DEFAULT_HTTP_REQUEST_TIMEOUT
    }
}
