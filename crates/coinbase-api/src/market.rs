//! Market data endpoints, returned as data frames or typed models.

use chrono::{DateTime, SecondsFormat, Utc};
use polars::prelude::DataFrame;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::client::{CoinbaseClient, Transport};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::frame::{candles_frame, decode_candles, record_frame, records_frame};
use crate::types::{Candle, Granularity, PairStats, TradingPair};

/// Most candles the exchange returns for one request.
///
/// Longer ranges are truncated upstream. The client warns about them but
/// still sends a single request.
pub const MAX_CANDLES_PER_REQUEST: i64 = 300;

/// Client for the public product and candle endpoints.
///
/// Each call issues exactly one GET through the transport and builds a fresh
/// result. Errors are logged and returned unchanged, never retried.
#[derive(Debug, Clone)]
pub struct ExchangeDataClient<T = CoinbaseClient> {
    transport: T,
}

impl ExchangeDataClient<CoinbaseClient> {
    /// Create a client for the default public endpoint.
    pub fn public() -> Result<Self> {
        Self::with_config(Config::default())
    }

    /// Create a client over HTTP with the given configuration.
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self::new(CoinbaseClient::new(config)?))
    }
}

impl<T: Transport> ExchangeDataClient<T> {
    /// Create a client over the given transport.
    pub fn new(transport: T) -> Self {
        tracing::info!(
            "ExchangeDataClient initialized with endpoint {}",
            transport.base_url()
        );
        Self { transport }
    }

    /// Get the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// List all trading pairs, keyed by the leading `id` column.
    ///
    /// Ids are assumed unique; duplicates are kept as separate rows.
    pub fn list_trading_pairs(&self) -> Result<DataFrame> {
        tracing::debug!("Fetching trading pairs");
        self.fetch_pairs_frame()
            .map(|df| {
                tracing::info!("Successfully fetched {} trading pairs", df.height());
                df
            })
            .map_err(|e| {
                tracing::error!("Error fetching trading pairs: {}", e);
                e
            })
    }

    fn fetch_pairs_frame(&self) -> Result<DataFrame> {
        let records: Vec<Value> = self.get_json("/products", &[])?;
        Ok(records_frame(records, Some("id"))?)
    }

    /// Get the current snapshot for `pair` as a one-row frame.
    ///
    /// `pair` is not validated; an unknown pair yields whatever the exchange
    /// answers, usually a 404 upstream error.
    pub fn get_pair_stats(&self, pair: &str) -> Result<DataFrame> {
        tracing::debug!("Fetching stats for pair {}", pair);
        self.get_json::<Map<String, Value>>(&product_endpoint(pair), &[])
            .and_then(|record| Ok(record_frame(record)?))
            .map(|df| {
                tracing::info!("Successfully fetched stats for pair {}", pair);
                df
            })
            .map_err(|e| {
                tracing::error!("Error fetching stats for pair {}: {}", pair, e);
                e
            })
    }

    /// Get candles for `pair` between `begin` and `end`.
    ///
    /// Columns are `timestamp, low, high, open, close, volume` in that order,
    /// `timestamp` being the row key. Rows keep the exchange's order (newest
    /// first). A row with other than six values fails the whole call.
    /// `begin < end` is not checked locally.
    pub fn get_historical_data(
        &self,
        pair: &str,
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
        granularity: Granularity,
    ) -> Result<DataFrame> {
        tracing::debug!(
            "Fetching historical data for pair {} from {} to {} with granularity {}",
            pair,
            begin,
            end,
            granularity
        );
        self.fetch_candles(pair, begin, end, granularity)
            .and_then(|candles| Ok(candles_frame(&candles)?))
            .map(|df| {
                tracing::info!(
                    "Successfully fetched {} candles for pair {}",
                    df.height(),
                    pair
                );
                df
            })
            .map_err(|e| {
                tracing::error!("Error fetching historical data for pair {}: {}", pair, e);
                e
            })
    }

    fn fetch_candles(
        &self,
        pair: &str,
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
        granularity: Granularity,
    ) -> Result<Vec<Candle>> {
        let params = candle_params(begin, end, granularity);
        let rows: Vec<Value> = self.get_json(&candles_endpoint(pair), &params)?;
        decode_candles(rows)
    }

    /// List all trading pairs as typed models.
    pub fn trading_pairs(&self) -> Result<Vec<TradingPair>> {
        tracing::debug!("Fetching trading pairs");
        self.get_json("/products", &[]).map_err(|e| {
            tracing::error!("Error fetching trading pairs: {}", e);
            e
        })
    }

    /// Get the current snapshot for `pair` as a typed model.
    pub fn pair_stats(&self, pair: &str) -> Result<PairStats> {
        tracing::debug!("Fetching stats for pair {}", pair);
        self.get_json(&product_endpoint(pair), &[]).map_err(|e| {
            tracing::error!("Error fetching stats for pair {}: {}", pair, e);
            e
        })
    }

    /// Get candles for `pair` as typed models, in the exchange's order.
    pub fn candles(
        &self,
        pair: &str,
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
        granularity: Granularity,
    ) -> Result<Vec<Candle>> {
        tracing::debug!(
            "Fetching candles for pair {} from {} to {} with granularity {}",
            pair,
            begin,
            end,
            granularity
        );
        self.fetch_candles(pair, begin, end, granularity).map_err(|e| {
            tracing::error!("Error fetching candles for pair {}: {}", pair, e);
            e
        })
    }

    fn get_json<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<R> {
        let body = self.transport.get(endpoint, params)?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse response: {}", body);
            Error::Json(e)
        })
    }
}

fn product_endpoint(pair: &str) -> String {
    format!("/products/{pair}")
}

fn candles_endpoint(pair: &str) -> String {
    format!("/products/{pair}/candles")
}

fn candle_params(
    begin: DateTime<Utc>,
    end: DateTime<Utc>,
    granularity: Granularity,
) -> Vec<(&'static str, String)> {
    if exceeds_request_limit(begin, end, granularity) {
        tracing::warn!(
            "Range {} to {} spans {} candles at granularity {}, upstream returns at most {}",
            begin,
            end,
            expected_candles(begin, end, granularity),
            granularity,
            MAX_CANDLES_PER_REQUEST
        );
    }

    vec![
        ("start", begin.to_rfc3339_opts(SecondsFormat::Secs, true)),
        ("end", end.to_rfc3339_opts(SecondsFormat::Secs, true)),
        ("granularity", granularity.seconds().to_string()),
    ]
}

/// Number of buckets between `begin` and `end`; negative when reversed.
fn expected_candles(begin: DateTime<Utc>, end: DateTime<Utc>, granularity: Granularity) -> i64 {
    (end - begin).num_seconds() / i64::from(granularity.seconds())
}

fn exceeds_request_limit(
    begin: DateTime<Utc>,
    end: DateTime<Utc>,
    granularity: Granularity,
) -> bool {
    expected_candles(begin, end, granularity) > MAX_CANDLES_PER_REQUEST
}
