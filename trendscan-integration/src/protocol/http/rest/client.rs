use crate::{
    error::SocketError,
    protocol::http::{BuildStrategy, HttpParser, rest::RestRequest},
};
use bytes::Bytes;
use reqwest::StatusCode;
use std::{
    borrow::Cow,
    time::{Duration, Instant},
};
use tracing::debug;

/// Generic executor of [`RestRequest`]s against a single base Url.
///
/// How requests are finalised (eg/ mandatory headers) is delegated to the `Strategy`, and how
/// responses are decoded to the `Parser`.
#[derive(Debug, Clone)]
pub struct RestClient<'a, Strategy, Parser> {
    pub http_client: reqwest::Client,

    /// Base Url every [`RestRequest::path`] is appended to.
    pub base_url: Cow<'a, str>,

    pub strategy: Strategy,

    pub parser: Parser,
}

impl<Strategy, Parser> RestClient<'_, Strategy, Parser>
where
    Strategy: BuildStrategy,
    Parser: HttpParser,
{
    /// Build, send and parse the provided [`RestRequest`].
    ///
    /// The parsed response is returned alongside the Http round trip [`Duration`].
    pub async fn execute<Request>(
        &self,
        request: Request,
    ) -> Result<(Request::Response, Duration), Parser::OutputError>
    where
        Request: RestRequest,
    {
        let request = self.build(request)?;
        let (status, payload, latency) = self.measured_execution(request).await?;

        self.parser
            .parse::<Request::Response>(status, &payload)
            .map(|response| (response, latency))
    }

    /// Translate a [`RestRequest`] into a ready to send [`reqwest::Request`].
    ///
    /// A [`RestRequest::multipart`] form takes precedence over a JSON [`RestRequest::body`].
    pub fn build<Request>(&self, request: Request) -> Result<reqwest::Request, SocketError>
    where
        Request: RestRequest,
    {
        let url = format!("{}{}", self.base_url, request.path());

        let mut builder = self
            .http_client
            .request(Request::method(), url)
            .timeout(request.timeout());

        if let Some(query_params) = request.query_params() {
            builder = builder.query(query_params);
        }

        builder = match (request.multipart(), request.body()) {
            (Some(form), _) => builder.multipart(form),
            (None, Some(body)) => builder.json(body),
            (None, None) => builder,
        };

        self.strategy.build(request, builder)
    }

    /// Send a built [`reqwest::Request`], returning the response status, raw payload and the
    /// round trip [`Duration`].
    pub async fn measured_execution(
        &self,
        request: reqwest::Request,
    ) -> Result<(StatusCode, Bytes, Duration), SocketError> {
        // Url path is never logged, it may embed credentials (eg/ bot tokens)
        let method = request.method().clone();

        let start = Instant::now();
        let response = self.http_client.execute(request).await?;
        let latency = start.elapsed();

        let status = response.status();
        let payload = response.bytes().await?;

        debug!(
            http_method = %method,
            base_url = %self.base_url,
            status_code = status.as_u16(),
            duration_ms = latency.as_millis() as u64,
            "executed http request"
        );

        Ok((status, payload, latency))
    }
}

impl<'a, Strategy, Parser> RestClient<'a, Strategy, Parser> {
    pub fn new<Url>(base_url: Url, strategy: Strategy, parser: Parser) -> Self
    where
        Url: Into<Cow<'a, str>>,
    {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
            strategy,
            parser,
        }
    }
}
