use crate::{
    bar::BarSeries,
    error::DataError,
    frame::ColumnFrame,
    interval::Interval,
    provider::MarketDataProvider,
    symbol::Symbol,
};
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use indexmap::IndexMap;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::{borrow::Cow, time::Duration};
use tracing::debug;
use trendscan_integration::{
    de::{de_null_as_default, de_vec_epoch_s_as_datetime_utc},
    protocol::http::{
        HttpParser,
        public::PublicHeaders,
        rest::{DEFAULT_HTTP_REQUEST_TIMEOUT, RestRequest, client::RestClient},
    },
};

pub const YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Yahoo rejects requests without a browser-like `User-Agent`.
const YAHOO_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Intervals the chart API serves natively. Notably `45m` is absent.
pub const YAHOO_NATIVE_INTERVALS: [Interval; 9] = [
    Interval::minutes(1),
    Interval::minutes(2),
    Interval::minutes(5),
    Interval::M15,
    Interval::M30,
    Interval::M60,
    Interval::minutes(90),
    Interval::hours(1),
    Interval::days(1),
];

/// [`MarketDataProvider`] backed by the Yahoo Finance `v8/finance/chart` endpoint.
#[derive(Debug, Clone)]
pub struct YahooChart {
    client: RestClient<'static, PublicHeaders, YahooParser>,
    timeout: Duration,
}

impl Default for YahooChart {
    fn default() -> Self {
        Self::new(YAHOO_BASE_URL, DEFAULT_HTTP_REQUEST_TIMEOUT)
    }
}

impl YahooChart {
    pub fn new<Url>(base_url: Url, timeout: Duration) -> Self
    where
        Url: Into<Cow<'static, str>>,
    {
        Self {
            client: RestClient::new(
                base_url,
                PublicHeaders::user_agent(YAHOO_USER_AGENT),
                YahooParser,
            ),
            timeout,
        }
    }
}

#[async_trait]
impl MarketDataProvider for YahooChart {
    fn native_intervals(&self) -> &[Interval] {
        &YAHOO_NATIVE_INTERVALS
    }

    async fn fetch(
        &self,
        symbol: &Symbol,
        interval: Interval,
        lookback: TimeDelta,
    ) -> Result<BarSeries, DataError> {
        let now = Utc::now();
        let start = now
            .checked_sub_signed(lookback)
            .ok_or_else(|| DataError::Provider(format!("lookback out of range: {lookback}")))?;

        let request = FetchChart {
            symbol: symbol.clone(),
            params: ChartParams {
                interval: interval.to_string(),
                period1: start.timestamp(),
                period2: now.timestamp(),
                include_pre_post: false,
            },
            timeout: self.timeout,
        };

        let (response, latency) = self.client.execute(request).await?;
        debug!(
            %symbol,
            %interval,
            latency_ms = latency.as_millis() as u64,
            "fetched Yahoo chart"
        );

        response.into_frame()?.normalise(symbol.clone(), interval)
    }
}

/// Yahoo chart [`RestRequest`] for one symbol.
#[derive(Debug, Clone)]
pub struct FetchChart {
    pub symbol: Symbol,
    pub params: ChartParams,
    pub timeout: Duration,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartParams {
    pub interval: String,
    pub period1: i64,
    pub period2: i64,
    #[serde(rename = "includePrePost")]
    pub include_pre_post: bool,
}

impl RestRequest for FetchChart {
    type Response = ChartResponse;
    type QueryParams = ChartParams;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        Cow::Owned(format!("/v8/finance/chart/{}", self.symbol))
    }

    fn method() -> reqwest::Method {
        reqwest::Method::GET
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(&self.params)
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Yahoo chart response.
///
/// ### Raw Payload Examples
/// ```json
/// {
///   "chart": {
///     "result": [
///       {
///         "meta": { "symbol": "INFY.NS", "dataGranularity": "15m" },
///         "timestamp": [1718940600, 1718941500],
///         "indicators": {
///           "quote": [
///             {
///               "open": [1512.0, 1515.5],
///               "high": [1518.9, 1516.0],
///               "low": [1510.1, null],
///               "close": [1515.4, null],
///               "volume": [120345, 0]
///             }
///           ]
///         }
///       }
///     ],
///     "error": null
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChartResponse {
    pub chart: ChartBody,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChartBody {
    #[serde(default, deserialize_with = "de_null_as_default")]
    pub result: Vec<ChartResult>,
    #[serde(default)]
    pub error: Option<ChartError>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChartResult {
    #[serde(default, deserialize_with = "de_vec_epoch_s_as_datetime_utc")]
    pub timestamp: Vec<DateTime<Utc>>,
    #[serde(default)]
    pub indicators: ChartIndicators,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ChartIndicators {
    #[serde(default)]
    pub quote: Vec<IndexMap<String, Vec<Option<f64>>>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChartError {
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ChartResponse {
    /// Extract the quote columns of the first result.
    ///
    /// A chart error, or a response without results, is [`DataError::NoData`].
    pub fn into_frame(self) -> Result<ColumnFrame, DataError> {
        if let Some(error) = self.chart.error {
            debug!(code = %error.code, description = ?error.description, "Yahoo chart error");
            return Err(DataError::NoData);
        }

        let result = self.chart.result.into_iter().next().ok_or(DataError::NoData)?;
        let columns = result
            .indicators
            .quote
            .into_iter()
            .next()
            .unwrap_or_default();

        Ok(ColumnFrame::new(result.timestamp, columns))
    }
}

/// Error bodies Yahoo answers with.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum YahooApiError {
    /// Envelope outside of the `chart` object, eg/ when throttling.
    Finance { finance: YahooFinanceError },
    /// Chart envelope sent with a failed status, eg/ `404` for an unknown symbol.
    Chart { chart: ChartBody },
}

#[derive(Debug, Clone, Deserialize)]
pub struct YahooFinanceError {
    pub error: ChartError,
}

#[derive(Debug, Copy, Clone)]
pub struct YahooParser;

impl HttpParser for YahooParser {
    type ApiError = YahooApiError;
    type OutputError = DataError;

    fn parse_api_error(
        &self,
        status: StatusCode,
        error: Self::ApiError,
        _: &[u8],
    ) -> Self::OutputError {
        match error {
            YahooApiError::Finance { finance } => {
                let ChartError { code, description } = finance.error;
                DataError::Provider(format!(
                    "status={} code={code} description={}",
                    status.as_u16(),
                    description.unwrap_or_default()
                ))
            }
            YahooApiError::Chart { chart } => {
                debug!(status_code = status.as_u16(), error = ?chart.error, "Yahoo chart error");
                DataError::NoData
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_de_chart_response_into_series() {
        let input = r#"
        {
            "chart": {
                "result": [
                    {
                        "meta": { "symbol": "INFY.NS", "dataGranularity": "15m" },
                        "timestamp": [1718940600, 1718941500, 1718942400],
                        "indicators": {
                            "quote": [
                                {
                                    "open": [1512.0, 1515.5, 1516.0],
                                    "high": [1518.9, 1516.0, 1520.0],
                                    "low": [1510.1, null, 1514.0],
                                    "close": [1515.4, null, 1519.0],
                                    "volume": [120345, 0, 98000]
                                }
                            ]
                        }
                    }
                ],
                "error": null
            }
        }
        "#;

        let response = serde_json::from_str::<ChartResponse>(input).unwrap();
        let series = response
            .into_frame()
            .unwrap()
            .normalise(Symbol::from("INFY.NS"), Interval::M15)
            .unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![1515.4, 1519.0]);
        assert_eq!(series.bars()[0].time.timestamp(), 1_718_940_600);
        assert_eq!(series.bars()[1].volume, 98000.0);
        assert!(series.has_full_ohlc());
    }

    #[test]
    fn test_chart_response_without_data() {
        struct TestCase {
            input: &'static str,
        }

        let tests = vec![
            TestCase {
                // TC0: unknown symbol
                input: r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#,
            },
            TestCase {
                // TC1: empty result list
                input: r#"{"chart":{"result":[],"error":null}}"#,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let response = serde_json::from_str::<ChartResponse>(test.input).unwrap();
            assert_eq!(response.into_frame(), Err(DataError::NoData), "TC{} failed", index);
        }
    }

    #[test]
    fn test_chart_result_without_timestamps_normalises_to_no_data() {
        let input = r#"{"chart":{"result":[{"meta":{},"indicators":{"quote":[{}]}}],"error":null}}"#;

        let frame = serde_json::from_str::<ChartResponse>(input)
            .unwrap()
            .into_frame()
            .unwrap();

        assert_eq!(
            frame.normalise(Symbol::from("UPL.NS"), Interval::M15),
            Err(DataError::NoData)
        );
    }

    #[test]
    fn test_yahoo_parser_api_error() {
        let payload = br#"{"finance":{"result":null,"error":{"code":"Too Many Requests","description":"Rate limited"}}}"#;

        let actual = YahooParser.parse::<ChartResponse>(StatusCode::TOO_MANY_REQUESTS, payload);

        assert_eq!(
            actual,
            Err(DataError::Provider(
                "status=429 code=Too Many Requests description=Rate limited".to_string()
            ))
        );
    }

    #[test]
    fn test_yahoo_parser_failed_status() {
        struct TestCase {
            status: StatusCode,
            payload: &'static str,
            expected: DataError,
        }

        let tests = vec![
            TestCase {
                // TC0: unknown symbol answered with a chart error
                status: StatusCode::NOT_FOUND,
                payload: r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#,
                expected: DataError::NoData,
            },
            TestCase {
                // TC1: unrecognised body keeps status & body
                status: StatusCode::SERVICE_UNAVAILABLE,
                payload: "Service Unavailable",
                expected: DataError::Socket(
                    "HTTP response (status=503 Service Unavailable) error: Service Unavailable"
                        .to_string(),
                ),
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = YahooParser.parse::<ChartResponse>(test.status, test.payload.as_bytes());
            assert_eq!(actual, Err(test.expected), "TC{} failed", index);
        }
    }

    #[tokio::test]
    async fn test_fetch_rejects_lookback_out_of_range() {
        let actual = YahooChart::new("http://127.0.0.1:1", DEFAULT_HTTP_REQUEST_TIMEOUT)
            .fetch(&Symbol::from("INFY.NS"), Interval::M15, TimeDelta::MAX)
            .await;

        assert!(matches!(actual, Err(DataError::Provider(_))));
    }
}
