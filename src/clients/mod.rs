// Exchange clients
//
// The rest of the crate only sees `MarketDataSource`; swap in a fake for tests.

pub mod binance;
pub mod retry;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DeskResult;
use crate::market_data::{Candle, OrderBook};

pub use binance::{normalize_symbol, BinanceClient};
pub use retry::RetryPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketType {
    Spot,
    Perp,
}

impl fmt::Display for MarketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketType::Spot => write!(f, "spot"),
            MarketType::Perp => write!(f, "perp"),
        }
    }
}

/// Read-only market data capability.
///
/// Timeouts must surface as `DeskError::ApiTimeout` so retry wrappers can
/// tell them apart from every other failure.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Order book for `pair`, at most `limit` levels per side
    async fn order_book(&self, pair: &str, limit: usize) -> DeskResult<OrderBook>;

    /// Up to `limit` candles for `pair`, oldest first
    async fn ohlcv(&self, pair: &str, timeframe: &str, limit: usize) -> DeskResult<Vec<Candle>>;
}
