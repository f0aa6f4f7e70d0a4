use crate::report::{DeliveryError, sink::NotificationSink};
use async_trait::async_trait;
use reqwest::{
    StatusCode,
    multipart::{Form, Part},
};
use serde::Deserialize;
use std::{borrow::Cow, time::Duration};
use tracing::debug;
use trendscan_integration::protocol::http::{
    HttpParser,
    public::PublicNoHeaders,
    rest::{DEFAULT_HTTP_REQUEST_TIMEOUT, RestRequest, client::RestClient},
};

pub const TELEGRAM_BASE_URL: &str = "https://api.telegram.org";

/// [`NotificationSink`] that uploads reports to a Telegram chat via the Bot API `sendDocument`
/// method.
#[derive(Clone)]
pub struct TelegramSink {
    client: RestClient<'static, PublicNoHeaders, TelegramParser>,
    bot_token: String,
    chat_id: String,
    timeout: Duration,
}

impl std::fmt::Debug for TelegramSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramSink")
            .field("base_url", &self.client.base_url)
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

impl TelegramSink {
    pub fn new<Url>(base_url: Url, bot_token: String, chat_id: String) -> Self
    where
        Url: Into<Cow<'static, str>>,
    {
        Self {
            client: RestClient::new(base_url, PublicNoHeaders, TelegramParser),
            bot_token,
            chat_id,
            timeout: DEFAULT_HTTP_REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    fn request(&self, payload: Vec<u8>, filename: &str) -> SendDocument {
        SendDocument {
            bot_token: self.bot_token.clone(),
            chat_id: self.chat_id.clone(),
            filename: filename.to_string(),
            payload,
            timeout: self.timeout,
        }
    }
}

#[async_trait]
impl NotificationSink for TelegramSink {
    async fn send(&self, payload: Vec<u8>, filename: &str) -> Result<(), DeliveryError> {
        let request = self.request(payload, filename);
        let (_, latency) = self.client.execute(request).await?;

        debug!(
            chat_id = %self.chat_id,
            %filename,
            latency_ms = latency.as_millis() as u64,
            "Telegram document delivered"
        );

        Ok(())
    }
}

/// Telegram `sendDocument` [`RestRequest`] uploading a single file.
#[derive(Debug, Clone)]
pub struct SendDocument {
    pub bot_token: String,
    pub chat_id: String,
    pub filename: String,
    pub payload: Vec<u8>,
    pub timeout: Duration,
}

impl RestRequest for SendDocument {
    type Response = TelegramMessage;
    type QueryParams = ();
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        Cow::Owned(format!("/bot{}/sendDocument", self.bot_token))
    }

    fn method() -> reqwest::Method {
        reqwest::Method::POST
    }

    fn multipart(&self) -> Option<Form> {
        let document = Part::bytes(self.payload.clone()).file_name(self.filename.clone());

        Some(
            Form::new()
                .text("chat_id", self.chat_id.clone())
                .part("document", document),
        )
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Telegram Bot API success envelope.
///
/// ### Raw Payload Examples
/// ```json
/// {"ok": true, "result": {"message_id": 17, "document": {"file_name": "44ma_candidates.csv"}}}
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TelegramMessage {
    pub ok: bool,
    pub result: serde_json::Value,
}

/// Telegram Bot API failure envelope.
///
/// ### Raw Payload Examples
/// ```json
/// {"ok": false, "error_code": 429, "description": "Too Many Requests: retry after 5", "parameters": {"retry_after": 5}}
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TelegramError {
    pub ok: bool,
    #[serde(default)]
    pub error_code: Option<u16>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Parses Telegram responses. Any rejection carries the Http status & the raw response body.
#[derive(Debug, Copy, Clone)]
pub struct TelegramParser;

impl HttpParser for TelegramParser {
    type ApiError = TelegramError;
    type OutputError = DeliveryError;

    fn parse_api_error(
        &self,
        status: StatusCode,
        error: Self::ApiError,
        payload: &[u8],
    ) -> Self::OutputError {
        debug!(
            status_code = status.as_u16(),
            error_code = ?error.error_code,
            description = ?error.description,
            "Telegram rejected request"
        );

        DeliveryError::Rejected {
            status: Some(status.as_u16()),
            response: String::from_utf8_lossy(payload).into_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_send_document() {
        let sink = TelegramSink::new(
            "https://telegram.test",
            "123:secret".to_string(),
            "-1001".to_string(),
        );

        let request = sink
            .client
            .build(sink.request(b"Symbol\n".to_vec(), "44ma_candidates.csv"))
            .unwrap();

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(
            request.url().as_str(),
            "https://telegram.test/bot123:secret/sendDocument"
        );
        assert!(
            request
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .unwrap()
                .to_str()
                .unwrap()
                .starts_with("multipart/form-data; boundary=")
        );
        assert!(!format!("{sink:?}").contains("secret"));
    }

    #[test]
    fn test_parse_telegram_response() {
        struct TestCase {
            status: StatusCode,
            payload: &'static str,
            expected: Result<(), DeliveryError>,
        }

        let rejected = |status: Option<u16>, response: &str| {
            Err(DeliveryError::Rejected {
                status,
                response: response.to_string(),
            })
        };

        let tests = vec![
            TestCase {
                // TC0: delivered
                status: StatusCode::OK,
                payload: r#"{"ok":true,"result":{"message_id":17}}"#,
                expected: Ok(()),
            },
            TestCase {
                // TC1: rejected by Telegram
                status: StatusCode::BAD_REQUEST,
                payload: r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#,
                expected: rejected(
                    Some(400),
                    r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#,
                ),
            },
            TestCase {
                // TC2: fields beyond the envelope are kept verbatim
                status: StatusCode::TOO_MANY_REQUESTS,
                payload: r#"{"ok":false,"error_code":429,"description":"Too Many Requests: retry after 5","parameters":{"retry_after":5}}"#,
                expected: rejected(
                    Some(429),
                    r#"{"ok":false,"error_code":429,"description":"Too Many Requests: retry after 5","parameters":{"retry_after":5}}"#,
                ),
            },
            TestCase {
                // TC3: rejection answered with a 2xx status
                status: StatusCode::OK,
                payload: r#"{"ok":false,"description":"Forbidden"}"#,
                expected: rejected(Some(200), r#"{"ok":false,"description":"Forbidden"}"#),
            },
            TestCase {
                // TC4: unexpected JSON shape from a proxy
                status: StatusCode::BAD_GATEWAY,
                payload: r#"{"message":"upstream down"}"#,
                expected: rejected(Some(502), r#"{"message":"upstream down"}"#),
            },
            TestCase {
                // TC5: non-JSON failure body
                status: StatusCode::BAD_GATEWAY,
                payload: "<html>Bad Gateway</html>",
                expected: rejected(Some(502), "<html>Bad Gateway</html>"),
            },
            TestCase {
                // TC6: non-JSON success body
                status: StatusCode::OK,
                payload: "<html>hello</html>",
                expected: rejected(None, "<html>hello</html>"),
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = TelegramParser
                .parse::<TelegramMessage>(test.status, test.payload.as_bytes())
                .map(|_| ());
            assert_eq!(actual, test.expected, "TC{} failed", index);
        }
    }

    #[tokio::test]
    async fn test_send_transport_error_omits_bot_token() {
        let sink = TelegramSink::new(
            "http://127.0.0.1:1",
            "123:supersecret".to_string(),
            "-1001".to_string(),
        );

        let actual = sink.send(b"Symbol\n".to_vec(), "44ma_candidates.csv").await;

        match actual {
            Err(error @ DeliveryError::Transport(_)) => {
                assert!(!error.to_string().contains("supersecret"));
                assert!(!format!("{error:?}").contains("supersecret"));
            }
            other => panic!("expected transport error, got: {other:?}"),
        }
    }
}
