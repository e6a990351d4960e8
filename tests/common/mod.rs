// Common test utilities and helpers
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};

use crypto_desk_sim::{BookLevel, Candle, Config, DeskError, DeskResult, MarketDataSource, OrderBook};

/// In-memory exchange serving a fixed book and candle history
pub struct FakeExchange {
    pub book: OrderBook,
    pub candles: Vec<Candle>,
    pub book_calls: AtomicUsize,
    pub ohlcv_calls: AtomicUsize,
    pub fail_with: Option<DeskError>,
}

impl FakeExchange {
    pub fn new(book: OrderBook, candles: Vec<Candle>) -> Self {
        Self {
            book,
            candles,
            book_calls: AtomicUsize::new(0),
            ohlcv_calls: AtomicUsize::new(0),
            fail_with: None,
        }
    }

    /// Every call returns `err`
    pub fn failing(err: DeskError) -> Self {
        Self {
            fail_with: Some(err),
            ..Self::new(OrderBook::default(), Vec::new())
        }
    }

    pub fn book_calls(&self) -> usize {
        self.book_calls.load(Ordering::SeqCst)
    }

    pub fn ohlcv_calls(&self) -> usize {
        self.ohlcv_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataSource for FakeExchange {
    async fn order_book(&self, _pair: &str, limit: usize) -> DeskResult<OrderBook> {
        self.book_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }

        let mut book = self.book.clone();
        book.bids.truncate(limit);
        book.asks.truncate(limit);
        Ok(book)
    }

    async fn ohlcv(&self, _pair: &str, _timeframe: &str, limit: usize) -> DeskResult<Vec<Candle>> {
        self.ohlcv_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }

        let start = self.candles.len().saturating_sub(limit);
        Ok(self.candles[start..].to_vec())
    }
}

/// Small priority-ordered book around 100
pub fn sample_book() -> OrderBook {
    OrderBook {
        bids: vec![
            BookLevel::new(100.0, 1.0),
            BookLevel::new(99.5, 2.0),
            BookLevel::new(99.0, 3.0),
        ],
        asks: vec![BookLevel::new(100.5, 1.5), BookLevel::new(101.0, 2.5)],
        timestamp: Utc.timestamp_millis_opt(1_700_000_000_000).single(),
    }
}

/// Hourly candles with a deterministic oscillating close
pub fn hourly_candles(count: usize, base_price: f64) -> Vec<Candle> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    (0..count)
        .map(|i| {
            let close = base_price * (1.0 + 0.01 * ((i as f64) * 0.7).sin());
            Candle {
                timestamp: start + Duration::hours(i as i64),
                open: close,
                high: close * 1.002,
                low: close * 0.998,
                close,
                volume: 10.0 + i as f64,
            }
        })
        .collect()
}

/// Default config with a short path and small candle window for fast tests
pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.simulation.path_len = 20;
    config.exchange.candle_limit = 24 * 10;
    config.desk.depth = 2;
    config
}
