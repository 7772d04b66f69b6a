//! Common types used across the API.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Candle bucket width accepted by the candles endpoint.
///
/// Coinbase only serves these six resolutions, so any other width is
/// unrepresentable here and rejected before a request is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Granularity {
    /// 1 minute
    OneMinute,
    /// 5 minutes
    FiveMinutes,
    /// 15 minutes
    FifteenMinutes,
    /// 1 hour
    OneHour,
    /// 6 hours
    SixHours,
    /// 1 day
    OneDay,
}

impl Granularity {
    /// Bucket width in seconds, as sent in the `granularity` query parameter.
    pub fn seconds(self) -> u32 {
        match self {
            Granularity::OneMinute => 60,
            Granularity::FiveMinutes => 300,
            Granularity::FifteenMinutes => 900,
            Granularity::OneHour => 3600,
            Granularity::SixHours => 21600,
            Granularity::OneDay => 86400,
        }
    }

    /// Short label for this granularity.
    pub fn label(self) -> &'static str {
        match self {
            Granularity::OneMinute => "1m",
            Granularity::FiveMinutes => "5m",
            Granularity::FifteenMinutes => "15m",
            Granularity::OneHour => "1h",
            Granularity::SixHours => "6h",
            Granularity::OneDay => "1d",
        }
    }

    /// All granularities, finest first.
    pub fn all() -> &'static [Granularity] {
        &[
            Granularity::OneMinute,
            Granularity::FiveMinutes,
            Granularity::FifteenMinutes,
            Granularity::OneHour,
            Granularity::SixHours,
            Granularity::OneDay,
        ]
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.seconds())
    }
}

impl TryFrom<u32> for Granularity {
    type Error = Error;

    fn try_from(seconds: u32) -> Result<Self, Self::Error> {
        Granularity::all()
            .iter()
            .copied()
            .find(|g| g.seconds() == seconds)
            .ok_or_else(|| {
                Error::InvalidParameter(format!(
                    "granularity {seconds} is not one of 60, 300, 900, 3600, 21600, 86400"
                ))
            })
    }
}

impl From<Granularity> for u32 {
    fn from(value: Granularity) -> Self {
        value.seconds()
    }
}

impl FromStr for Granularity {
    type Err = Error;

    /// Accepts the width in seconds (`"3600"`) or the label (`"1h"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(seconds) = s.parse::<u32>() {
            return Granularity::try_from(seconds);
        }
        Granularity::all()
            .iter()
            .copied()
            .find(|g| g.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidParameter(format!("unknown granularity: {s}")))
    }
}

/// Decimal string wrapper that deserializes from string.
///
/// Coinbase sends prices, sizes and increments as JSON strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct StringDecimal(pub Decimal);

impl StringDecimal {
    /// Create a new StringDecimal.
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Get the inner Decimal value.
    pub fn inner(&self) -> Decimal {
        self.0
    }
}

impl From<Decimal> for StringDecimal {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<StringDecimal> for Decimal {
    fn from(value: StringDecimal) -> Self {
        value.0
    }
}

impl std::ops::Deref for StringDecimal {
    type Target = Decimal;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'de> Deserialize<'de> for StringDecimal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum StringOrNumber {
            String(String),
            Number(f64),
        }

        match StringOrNumber::deserialize(deserializer)? {
            StringOrNumber::String(s) => s
                .parse::<Decimal>()
                .map(StringDecimal)
                .map_err(|e| D::Error::custom(format!("invalid decimal: {e}"))),
            StringOrNumber::Number(n) => Decimal::try_from(n)
                .map(StringDecimal)
                .map_err(|e| D::Error::custom(format!("invalid decimal: {e}"))),
        }
    }
}

impl Serialize for StringDecimal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl std::fmt::Display for StringDecimal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
