// Repeated top-of-book sampling for mid/spread time series

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

use crate::clients::{MarketDataSource, MarketType};
use crate::error::DeskResult;
use crate::market_data::OrderBook;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSample {
    pub timestamp: DateTime<Utc>,
    pub market: MarketType,
    pub mid: f64,
    pub spread: f64,
}

impl BookSample {
    /// Falls back to the local clock when the exchange sends no book timestamp
    pub fn from_book(market: MarketType, book: &OrderBook) -> DeskResult<Self> {
        Ok(Self {
            timestamp: book.timestamp.unwrap_or_else(Utc::now),
            market,
            mid: book.mid()?,
            spread: book.spread()?,
        })
    }
}

/// Poll one market `samples` times, pausing `interval` after each fetch
pub async fn poll_order_book<S>(
    source: &S,
    market: MarketType,
    pair: &str,
    limit: usize,
    samples: usize,
    interval: Duration,
) -> DeskResult<Vec<BookSample>>
where
    S: MarketDataSource + ?Sized,
{
    let mut rows = Vec::with_capacity(samples);
    for i in 0..samples {
        let book = source.order_book(pair, limit).await?;
        let sample = BookSample::from_book(market, &book)?;
        debug!("📈 {} sample {}/{}: mid {:.4} spread {:.4}", market, i + 1, samples, sample.mid, sample.spread);
        rows.push(sample);
        sleep(interval).await;
    }
    Ok(rows)
}

/// Poll spot and perp once per tick, spot row first
pub async fn poll_order_books<S, P>(
    spot: &S,
    perp: &P,
    spot_pair: &str,
    perp_pair: &str,
    limit: usize,
    samples: usize,
    interval: Duration,
) -> DeskResult<Vec<BookSample>>
where
    S: MarketDataSource + ?Sized,
    P: MarketDataSource + ?Sized,
{
    let mut rows = Vec::with_capacity(samples * 2);
    for _ in 0..samples {
        let spot_book = spot.order_book(spot_pair, limit).await?;
        rows.push(BookSample::from_book(MarketType::Spot, &spot_book)?);

        let perp_book = perp.order_book(perp_pair, limit).await?;
        rows.push(BookSample::from_book(MarketType::Perp, &perp_book)?);

        sleep(interval).await;
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::BookLevel;

    #[test]
    fn test_sample_uses_book_timestamp() {
        let ts = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let book = OrderBook {
            bids: vec![BookLevel::new(99.0, 1.0)],
            asks: vec![BookLevel::new(101.0, 1.0)],
            timestamp: Some(ts),
        };

        let sample = BookSample::from_book(MarketType::Spot, &book).unwrap();
        assert_eq!(sample.timestamp, ts);
        assert_eq!(sample.mid, 100.0);
        assert_eq!(sample.spread, 2.0);
    }

    #[test]
    fn test_sample_on_empty_book_fails() {
        let book = OrderBook::default();
        assert!(BookSample::from_book(MarketType::Perp, &book).is_err());
    }
}
