use reqwest::{StatusCode, header::USER_AGENT};
use serde::{Deserialize, Serialize};
use std::{borrow::Cow, time::Duration};
use trendscan_integration::{
    error::SocketError,
    protocol::http::{
        HttpParser,
        public::{PublicHeaders, PublicNoHeaders},
        rest::{RestRequest, client::RestClient},
    },
};

#[derive(Debug, Serialize)]
struct QuoteParams {
    interval: &'static str,
    range: &'static str,
}

#[derive(Debug)]
struct FetchQuote {
    symbol: &'static str,
    params: QuoteParams,
}

#[derive(Debug, Deserialize, PartialEq)]
struct Quote {
    close: f64,
}

impl RestRequest for FetchQuote {
    type Response = Quote;
    type QueryParams = QuoteParams;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        Cow::Owned(format!("/quote/{}", self.symbol))
    }

    fn method() -> reqwest::Method {
        reqwest::Method::GET
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(&self.params)
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(3)
    }
}

#[derive(Debug)]
struct Upload;

impl RestRequest for Upload {
    type Response = Quote;
    type QueryParams = ();
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        Cow::Borrowed("/upload")
    }

    fn method() -> reqwest::Method {
        reqwest::Method::POST
    }

    fn multipart(&self) -> Option<reqwest::multipart::Form> {
        Some(reqwest::multipart::Form::new().text("chat_id", "42"))
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Debug, PartialEq)]
enum TestError {
    Api(u16, String),
    Status(u16, String),
    Undecodable(String),
}

impl From<SocketError> for TestError {
    fn from(error: SocketError) -> Self {
        match error {
            SocketError::HttpResponse(status, body) => Self::Status(status.as_u16(), body),
            error => Self::Undecodable(error.payload().unwrap_or_else(|| error.to_string())),
        }
    }
}

struct TestParser;

impl HttpParser for TestParser {
    type ApiError = ApiError;
    type OutputError = TestError;

    fn parse_api_error(
        &self,
        status: StatusCode,
        error: Self::ApiError,
        _: &[u8],
    ) -> Self::OutputError {
        TestError::Api(status.as_u16(), error.message)
    }
}

#[test]
fn test_build_get_request_with_query_and_headers() {
    let client = RestClient::new(
        "https://example.com",
        PublicHeaders::user_agent("trendscan-test"),
        TestParser,
    );

    let request = client
        .build(FetchQuote {
            symbol: "INFY.NS",
            params: QuoteParams {
                interval: "15m",
                range: "7d",
            },
        })
        .unwrap();

    assert_eq!(request.method(), reqwest::Method::GET);
    assert_eq!(request.url().path(), "/quote/INFY.NS");
    assert_eq!(request.url().query(), Some("interval=15m&range=7d"));
    assert_eq!(request.headers()[USER_AGENT], "trendscan-test");
    assert_eq!(request.timeout(), Some(&Duration::from_secs(3)));
}

#[test]
fn test_build_multipart_request() {
    let client = RestClient::new("https://example.com", PublicNoHeaders, TestParser);

    let request = client.build(Upload).unwrap();

    assert_eq!(request.method(), reqwest::Method::POST);
    let content_type = request.headers()[reqwest::header::CONTENT_TYPE]
        .to_str()
        .unwrap();
    assert!(content_type.starts_with("multipart/form-data"));
}

#[test]
fn test_http_parser_parse() {
    struct TestCase {
        status: StatusCode,
        payload: &'static [u8],
        expected: Result<Quote, TestError>,
    }

    let tests = vec![
        TestCase {
            // TC0: success payload
            status: StatusCode::OK,
            payload: br#"{"close": 101.5}"#,
            expected: Ok(Quote { close: 101.5 }),
        },
        TestCase {
            // TC1: api error payload
            status: StatusCode::NOT_FOUND,
            payload: br#"{"message": "symbol not found"}"#,
            expected: Err(TestError::Api(404, "symbol not found".to_string())),
        },
        TestCase {
            // TC2: failed status without an api error keeps status & raw body
            status: StatusCode::BAD_GATEWAY,
            payload: b"<html>bad gateway</html>",
            expected: Err(TestError::Status(502, "<html>bad gateway</html>".to_string())),
        },
        TestCase {
            // TC3: api error reported inside a 2xx body
            status: StatusCode::OK,
            payload: br#"{"message": "maintenance"}"#,
            expected: Err(TestError::Api(200, "maintenance".to_string())),
        },
        TestCase {
            // TC4: undecodable 2xx body surfaces the raw body
            status: StatusCode::OK,
            payload: b"<html>ok?</html>",
            expected: Err(TestError::Undecodable("<html>ok?</html>".to_string())),
        },
        TestCase {
            // TC5: failed status never yields a success response
            status: StatusCode::INTERNAL_SERVER_ERROR,
            payload: br#"{"close": 101.5}"#,
            expected: Err(TestError::Status(500, r#"{"close": 101.5}"#.to_string())),
        },
    ];

    for (index, test) in tests.into_iter().enumerate() {
        let actual = TestParser.parse::<Quote>(test.status, test.payload);
        assert_eq!(actual, test.expected, "TC{} failed", index);
    }
}
