use thiserror::Error;

/// All socket IO related errors generated in `trendscan-integration`.
#[derive(Debug, Error)]
pub enum SocketError {
    #[error("Deserialising JSON error: {error} for binary payload: {payload:?}")]
    DeserialiseBinary {
        error: serde_json::Error,
        payload: Vec<u8>,
    },

    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("HTTP request timed out")]
    HttpTimeout(reqwest::Error),

    /// Non-2xx response whose body is not a recognised API error.
    #[error("HTTP response (status={0}) error: {1}")]
    HttpResponse(reqwest::StatusCode, String),
}

impl From<reqwest::Error> for SocketError {
    /// The request Url is stripped, it may embed credentials (eg/ bot tokens).
    fn from(error: reqwest::Error) -> Self {
        match error.without_url() {
            error if error.is_timeout() => SocketError::HttpTimeout(error),
            error => SocketError::Http(error),
        }
    }
}

impl SocketError {
    /// Raw payload returned by the server, if this error carries one.
    pub fn payload(&self) -> Option<String> {
        match self {
            SocketError::DeserialiseBinary { payload, .. } => {
                Some(String::from_utf8_lossy(payload).into_owned())
            }
            SocketError::HttpResponse(_, body) => Some(body.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_error_payload() {
        let serde_error = || serde_json::from_str::<u64>("nope").unwrap_err();

        struct TestCase {
            input: SocketError,
            expected: Option<&'static str>,
        }

        let tests = vec![
            TestCase {
                // TC0: binary payload is returned lossily as a String
                input: SocketError::DeserialiseBinary {
                    error: serde_error(),
                    payload: b"<html>bad gateway</html>".to_vec(),
                },
                expected: Some("<html>bad gateway</html>"),
            },
            TestCase {
                // TC1: http response body is returned
                input: SocketError::HttpResponse(
                    reqwest::StatusCode::BAD_REQUEST,
                    "chat not found".to_string(),
                ),
                expected: Some("chat not found"),
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = test.input.payload();
            assert_eq!(actual.as_deref(), test.expected, "TC{} failed", index);
        }
    }
}
