//! Candle (OHLCV bucket) type.

use serde::{Deserialize, Serialize, Serializer};

/// Column order of a candle row as sent by `GET /products/{pair}/candles`.
pub const CANDLE_COLUMNS: [&str; 6] = ["timestamp", "low", "high", "open", "close", "volume"];

/// One candle bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    /// Bucket start, unix seconds.
    pub timestamp: i64,
    /// Lowest price.
    pub low: f64,
    /// Highest price.
    pub high: f64,
    /// First trade price.
    pub open: f64,
    /// Last trade price.
    pub close: f64,
    /// Traded base volume.
    pub volume: f64,
}

// Written back in the same array layout the exchange sends
impl Serialize for Candle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (
            self.timestamp,
            self.low,
            self.high,
            self.open,
            self.close,
            self.volume,
        )
            .serialize(serializer)
    }
}

// Candles come as `[time, low, high, open, close, volume]` arrays
impl<'de> Deserialize<'de> for Candle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        let arr: Vec<serde_json::Value> = Vec::deserialize(deserializer)?;

        if arr.len() != CANDLE_COLUMNS.len() {
            return Err(D::Error::custom(format!(
                "candle array has {} values, expected {}",
                arr.len(),
                CANDLE_COLUMNS.len()
            )));
        }

        let parse_f64 = |v: &serde_json::Value| -> Result<f64, D::Error> {
            match v {
                serde_json::Value::Number(n) => {
                    n.as_f64().ok_or_else(|| D::Error::custom("invalid number"))
                }
                serde_json::Value::String(s) => s
                    .parse()
                    .map_err(|e| D::Error::custom(format!("invalid number: {e}"))),
                _ => Err(D::Error::custom("expected string or number")),
            }
        };

        Ok(Candle {
            timestamp: arr[0]
                .as_i64()
                .ok_or_else(|| D::Error::custom("expected integer timestamp"))?,
            low: parse_f64(&arr[1])?,
            high: parse_f64(&arr[2])?,
            open: parse_f64(&arr[3])?,
            close: parse_f64(&arr[4])?,
            volume: parse_f64(&arr[5])?,
        })
    }
}
