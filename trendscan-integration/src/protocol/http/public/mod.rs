use super::{BuildStrategy, rest::RestRequest};
use crate::error::SocketError;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

/// [`RestRequest`] [`BuildStrategy`] that builds a non-authenticated Http request with no headers.
#[derive(Debug, Copy, Clone)]
pub struct PublicNoHeaders;

impl BuildStrategy for PublicNoHeaders {
    fn build<Request>(
        &self,
        _: Request,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Request, SocketError>
    where
        Request: RestRequest,
    {
        builder.build().map_err(SocketError::from)
    }
}

/// [`RestRequest`] [`BuildStrategy`] that builds a non-authenticated Http request with a fixed
/// set of mandatory headers.
///
/// Some public APIs reject requests that do not look like they originate from a browser.
#[derive(Debug, Clone, Default)]
pub struct PublicHeaders {
    pub headers: HeaderMap,
}

impl PublicHeaders {
    /// Construct a [`PublicHeaders`] that sends the provided `User-Agent` with every request.
    pub fn user_agent(user_agent: &'static str) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(user_agent));
        Self { headers }
    }
}

impl BuildStrategy for PublicHeaders {
    fn build<Request>(
        &self,
        _: Request,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Request, SocketError>
    where
        Request: RestRequest,
    {
        builder
            .headers(self.headers.clone())
            .build()
            .map_err(SocketError::from)
    }
}
