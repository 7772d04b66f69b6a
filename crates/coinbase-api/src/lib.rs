//! # Coinbase Exchange API Client Library
//!
//! A small blocking client for the public market data endpoints of the
//! Coinbase Exchange REST API.
//!
//! ## Features
//!
//! - **Trading pairs**: `GET /products` as a polars `DataFrame` keyed by product id
//! - **Pair stats**: `GET /products/{pair}` as a one-row `DataFrame`
//! - **Candles**: `GET /products/{pair}/candles` as a `DataFrame` keyed by timestamp
//! - **Typed models**: the same endpoints decoded into Rust structs
//! - **Pluggable transport**: swap HTTP for canned responses in tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chrono::{TimeZone, Utc};
//! use coinbase_api::{ExchangeDataClient, Granularity};
//!
//! fn main() -> Result<(), coinbase_api::Error> {
//!     let client = ExchangeDataClient::public()?;
//!
//!     let pairs = client.list_trading_pairs()?;
//!     println!("{}", pairs.head(Some(5)));
//!
//!     let stats = client.get_pair_stats("BTC-USD")?;
//!     println!("{stats}");
//!
//!     let candles = client.get_historical_data(
//!         "BTC-USD",
//!         Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
//!         Utc.with_ymd_and_hms(2023, 6, 30, 0, 0, 0).unwrap(),
//!         Granularity::OneDay,
//!     )?;
//!     println!("{}", candles.head(Some(5)));
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! ```rust,ignore
//! use coinbase_api::{Config, ExchangeDataClient};
//! use std::time::Duration;
//!
//! let config = Config::new("https://api-public.sandbox.exchange.coinbase.com")
//!     .with_timeout(Duration::from_secs(10))
//!     .with_user_agent("my-loader/1.0");
//!
//! let client = ExchangeDataClient::with_config(config)?;
//! ```

#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod error;
pub mod frame;
pub mod market;
pub mod types;

// Re-exports for convenience
pub use client::{CoinbaseClient, Transport};
pub use config::{Config, ConfigError};
pub use error::{Error, Result, UpstreamError};
pub use frame::TableError;
pub use market::ExchangeDataClient;
pub use polars::prelude::DataFrame;
pub use types::{Candle, Granularity, PairStats, StringDecimal, TradingPair};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Base URL for the Coinbase Exchange REST API
pub const BASE_URL: &str = "https://api.exchange.coinbase.com";

/// Prelude module for convenient imports.
pub mod prelude {
    //! Common imports for using the Coinbase API client.

    pub use crate::client::{CoinbaseClient, Transport};
    pub use crate::config::Config;
    pub use crate::error::{Error, Result, UpstreamError};
    pub use crate::frame::TableError;
    pub use crate::market::ExchangeDataClient;
    pub use polars::prelude::DataFrame;
    pub use crate::types::{Candle, Granularity, PairStats, StringDecimal, TradingPair};
}
