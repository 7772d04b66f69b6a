//! Product (trading pair) types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::common::StringDecimal;

/// A tradable product as listed by `GET /products`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TradingPair {
    /// Product id (e.g., "BTC-USD").
    pub id: String,
    /// Base currency (e.g., "BTC").
    pub base_currency: String,
    /// Quote currency (e.g., "USD").
    pub quote_currency: String,
    /// Minimum order size increment.
    pub base_increment: StringDecimal,
    /// Minimum price increment.
    pub quote_increment: StringDecimal,
    /// Human readable name (e.g., "BTC/USD").
    #[serde(default)]
    pub display_name: Option<String>,
    /// Trading status ("online", "delisted", ...).
    pub status: String,
    /// Is trading currently disabled.
    #[serde(default)]
    pub trading_disabled: bool,
    /// Every other attribute the exchange sent, unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Snapshot returned by `GET /products/{pair}`.
///
/// Known price fields are decoded when present; the rest is kept as sent.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PairStats {
    /// Product id.
    #[serde(default)]
    pub id: Option<String>,
    /// Open price.
    #[serde(default)]
    pub open: Option<StringDecimal>,
    /// High price.
    #[serde(default)]
    pub high: Option<StringDecimal>,
    /// Low price.
    #[serde(default)]
    pub low: Option<StringDecimal>,
    /// Last trade price.
    #[serde(default)]
    pub last: Option<StringDecimal>,
    /// Base volume.
    #[serde(default)]
    pub volume: Option<StringDecimal>,
    /// Every other attribute the exchange sent, unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
