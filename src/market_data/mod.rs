// Market data types and top-of-book utilities

pub mod polling;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{DeskError, DeskResult};

pub use polling::{poll_order_book, poll_order_books, BookSample};

/// Default number of levels per side in a depth snapshot
pub const DEFAULT_DEPTH: usize = 20;

/// A single (price, size) level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BookLevel {
    pub price: f64,
    pub size: f64,
}

impl BookLevel {
    pub fn new(price: f64, size: f64) -> Self {
        Self { price, size }
    }
}

impl From<(f64, f64)> for BookLevel {
    fn from((price, size): (f64, f64)) -> Self {
        Self { price, size }
    }
}

/// Order book as delivered by the exchange.
///
/// Bids are descending and asks ascending by price. Crossed books are not
/// rejected here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderBook {
    pub bids: Vec<BookLevel>,
    pub asks: Vec<BookLevel>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl OrderBook {
    pub fn new(bids: Vec<BookLevel>, asks: Vec<BookLevel>) -> Self {
        Self { bids, asks, timestamp: None }
    }

    pub fn best_bid(&self) -> Option<&BookLevel> {
        self.bids.first()
    }

    pub fn best_ask(&self) -> Option<&BookLevel> {
        self.asks.first()
    }

    pub fn mid(&self) -> DeskResult<f64> {
        mid_from_order_book(&self.bids, &self.asks)
    }

    pub fn spread(&self) -> DeskResult<f64> {
        spread_top(&self.bids, &self.asks)
    }

    pub fn depth_snapshot(&self, depth: usize) -> Vec<DepthRow> {
        depth_snapshot(&self.bids, &self.asks, depth)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Bid,
    Ask,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => write!(f, "bid"),
            Side::Ask => write!(f, "ask"),
        }
    }
}

/// One row of a flattened depth snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthRow {
    pub price: f64,
    pub size: f64,
    pub side: Side,
}

/// OHLCV candle, oldest first when in a sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Build a candle from an exchange row `[ts_ms, open, high, low, close, volume]`
    pub fn from_row(timestamp_ms: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> DeskResult<Self> {
        let timestamp = DateTime::from_timestamp_millis(timestamp_ms)
            .ok_or_else(|| DeskError::ApiParse(format!("Invalid candle timestamp: {}", timestamp_ms)))?;
        Ok(Self { timestamp, open, high, low, close, volume })
    }

    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }
}

/// Close prices of a candle sequence, in order
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

/// Average of best bid and best ask
pub fn mid_from_order_book(bids: &[BookLevel], asks: &[BookLevel]) -> DeskResult<f64> {
    let (bid, ask) = top_of_book(bids, asks)?;
    Ok((bid + ask) / 2.0)
}

/// Best ask minus best bid
pub fn spread_top(bids: &[BookLevel], asks: &[BookLevel]) -> DeskResult<f64> {
    let (bid, ask) = top_of_book(bids, asks)?;
    Ok(ask - bid)
}

fn top_of_book(bids: &[BookLevel], asks: &[BookLevel]) -> DeskResult<(f64, f64)> {
    match (bids.first(), asks.first()) {
        (Some(bid), Some(ask)) => Ok((bid.price, ask.price)),
        (None, _) => Err(DeskError::insufficient("order book has no bids")),
        (_, None) => Err(DeskError::insufficient("order book has no asks")),
    }
}

/// Flatten the first `depth` levels of each side into tagged rows, bids first.
/// Sides shorter than `depth` contribute every level they have.
pub fn depth_snapshot(bids: &[BookLevel], asks: &[BookLevel], depth: usize) -> Vec<DepthRow> {
    let tag = |levels: &[BookLevel], side: Side| {
        levels
            .iter()
            .take(depth)
            .map(move |l| DepthRow { price: l.price, size: l.size, side })
            .collect::<Vec<_>>()
    };

    let mut rows = tag(bids, Side::Bid);
    rows.extend(tag(asks, Side::Ask));
    rows
}
