//! Yahoo Finance chart API client.
//!
//! `GET {base}/v8/finance/chart/{ticker}?range=1d&interval=1d` returns the
//! latest trading day as a one-bar series; the close is taken from the last
//! bar that has one and dated in the exchange's timezone.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use chrono_tz::Tz;
use ledgerkit_core::DailyClose;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::source::{FetchError, QuoteSource};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

// Yahoo rejects requests without a browser-like agent.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid market base url {0:?}")]
    BaseUrl(String),
    #[error("building http client: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct YahooClient {
    http: reqwest::Client,
    base_url: Url,
}

impl YahooClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url).map_err(|_| ClientError::BaseUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::BaseUrl(base_url.to_string()));
        }
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { http, base_url })
    }

    pub fn chart_url(&self, ticker: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["v8", "finance", "chart", ticker]);
        }
        url.query_pairs_mut()
            .append_pair("range", "1d")
            .append_pair("interval", "1d");
        url
    }
}

impl QuoteSource for YahooClient {
    async fn latest_close(&self, ticker: &str) -> Result<DailyClose, FetchError> {
        let url = self.chart_url(ticker);
        log::debug!("GET {url}");

        let resp = self
            .http
            .get(url)
            .header("referer", "https://finance.yahoo.com/")
            .send()
            .await
            .map_err(|e| FetchError::transport(ticker, e.to_string()))?;

        let status = resp.status();
        // 404 carries a chart.error body ("No data found, symbol may be delisted")
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            return Err(FetchError::transport(ticker, format!("yahoo returned status {status}")));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| FetchError::transport(ticker, e.to_string()))?;

        parse_chart_response(ticker, &body)
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartApiError>,
}

#[derive(Debug, Deserialize)]
struct ChartApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(rename = "exchangeTimezoneName", default)]
    exchange_timezone_name: Option<String>,
    #[serde(default)]
    gmtoffset: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Interpret a chart response body.
pub fn parse_chart_response(ticker: &str, body: &str) -> Result<DailyClose, FetchError> {
    let resp: ChartResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::malformed(ticker, format!("failed to parse yahoo chart: {e}")))?;

    if let Some(err) = resp.chart.error {
        return Err(FetchError::no_data(ticker, format!("{}: {}", err.code, err.description)));
    }

    let result = resp
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| FetchError::no_data(ticker, "no chart data in response"))?;

    let timestamps = result.timestamp.unwrap_or_default();
    if timestamps.is_empty() {
        return Err(FetchError::no_data(ticker, "no trading days in range"));
    }

    let quote = result
        .indicators
        .quote
        .first()
        .ok_or_else(|| FetchError::malformed(ticker, "no quote indicators"))?;

    let (ts, close) = timestamps
        .iter()
        .zip(quote.close.iter())
        .rev()
        .find_map(|(ts, close)| close.map(|c| (*ts, c)))
        .ok_or_else(|| FetchError::no_data(ticker, "no closing price"))?;

    if !close.is_finite() || close <= 0.0 {
        return Err(FetchError::malformed(ticker, format!("implausible close {close}")));
    }

    let date = trading_date(ticker, ts, &result.meta)?;
    Ok(DailyClose { close, date })
}

fn trading_date(ticker: &str, ts: i64, meta: &ChartMeta) -> Result<NaiveDate, FetchError> {
    let utc: DateTime<Utc> = DateTime::from_timestamp(ts, 0)
        .ok_or_else(|| FetchError::malformed(ticker, format!("invalid timestamp {ts}")))?;

    if let Some(name) = &meta.exchange_timezone_name {
        let tz: Tz = name
            .parse()
            .map_err(|_| FetchError::malformed(ticker, format!("unknown exchange timezone {name}")))?;
        return Ok(utc.with_timezone(&tz).date_naive());
    }

    if let Some(offset) = meta.gmtoffset {
        let offset = FixedOffset::east_opt(offset)
            .ok_or_else(|| FetchError::malformed(ticker, format!("invalid gmtoffset {offset}")))?;
        return Ok(utc.with_timezone(&offset).date_naive());
    }

    Err(FetchError::malformed(ticker, "no exchange timezone in chart meta"))
}
