//! Data types and models for Coinbase Exchange API responses.

mod candle;
mod common;
mod product;

pub use candle::*;
pub use common::*;
pub use product::*;
