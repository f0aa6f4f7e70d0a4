use self::rest::RestRequest;
use crate::error::SocketError;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{error, warn};

/// Defines an abstract [`RestRequest`] that can be executed by a fully
/// configurable [`RestClient`](rest::client::RestClient).
pub mod rest;

/// Defines default [`BuildStrategy`]s that build non-authenticated Http [`RestRequest`]s.
pub mod public;

/// [`RestRequest`] build strategy for the API being interacted with.
///
/// An API that requires no authentication may just add mandatory `reqwest` headers to the
/// [`RestRequest`] before building. Credentials that live in the Url path (eg/ a bot token)
/// are the responsibility of the [`RestRequest::path`].
pub trait BuildStrategy {
    /// Use a [`RestRequest`] and [`reqwest::RequestBuilder`] to construct a [`reqwest::Request`]
    /// that is ready for executing.
    fn build<Request>(
        &self,
        request: Request,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Request, SocketError>
    where
        Request: RestRequest;
}

/// Decodes the payload of an executed [`RestRequest`] into either the expected `Response` or an
/// API specific error.
///
/// APIs disagree on where failures live: some answer 2xx with an error body, others use a
/// non-2xx status with or without a JSON body. The default [`parse`](Self::parse) handles both.
pub trait HttpParser {
    type ApiError: DeserializeOwned;
    type OutputError: From<SocketError>;

    /// Decode a [`StatusCode`] & raw payload.
    ///
    /// * 2xx: the `Response`, else the [`Self::ApiError`], else
    ///   [`SocketError::DeserialiseBinary`].
    /// * Otherwise: the [`Self::ApiError`], else [`SocketError::HttpResponse`] carrying the body.
    fn parse<Response>(
        &self,
        status: StatusCode,
        payload: &[u8],
    ) -> Result<Response, Self::OutputError>
    where
        Response: DeserializeOwned,
    {
        if status.is_success() {
            let parse_ok_error = match serde_json::from_slice::<Response>(payload) {
                Ok(response) => return Ok(response),
                Err(serde_error) => serde_error,
            };

            if let Ok(api_error) = serde_json::from_slice::<Self::ApiError>(payload) {
                return Err(self.parse_api_error(status, api_error, payload));
            }

            error!(
                status_code = status.as_u16(),
                ?parse_ok_error,
                response_body = %String::from_utf8_lossy(payload),
                "error deserializing HTTP response"
            );

            return Err(Self::OutputError::from(SocketError::DeserialiseBinary {
                error: parse_ok_error,
                payload: payload.to_vec(),
            }));
        }

        match serde_json::from_slice::<Self::ApiError>(payload) {
            Ok(api_error) => Err(self.parse_api_error(status, api_error, payload)),
            Err(_) => {
                let body = String::from_utf8_lossy(payload).into_owned();
                warn!(status_code = status.as_u16(), response_body = %body, "HTTP request failed");
                Err(Self::OutputError::from(SocketError::HttpResponse(status, body)))
            }
        }
    }

    /// Map a decoded [`Self::ApiError`] into the [`Self::OutputError`]. The raw `payload` it was
    /// decoded from is provided for parsers that must preserve the server's exact response.
    fn parse_api_error(
        &self,
        status: StatusCode,
        error: Self::ApiError,
        payload: &[u8],
    ) -> Self::OutputError;
}
