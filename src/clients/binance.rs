// Binance REST market data client (spot and USD-M perpetuals)

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::clients::{MarketDataSource, MarketType, RetryPolicy};
use crate::config::ExchangeConfig;
use crate::error::{DeskError, DeskResult};
use crate::market_data::{BookLevel, Candle, OrderBook};

/// Binance caps klines at 1000 rows per request
pub const MAX_KLINES_PER_REQUEST: usize = 1000;

const VALID_INTERVALS: &[&str] = &[
    "1m", "3m", "5m", "15m", "30m", "1h", "2h", "4h", "6h", "8h", "12h", "1d", "3d", "1w", "1M",
];

#[derive(Debug, Clone)]
pub struct BinanceClient {
    client: reqwest::Client,
    base_url: String,
    market: MarketType,
    retry: RetryPolicy,
}

impl BinanceClient {
    pub fn new(
        market: MarketType,
        base_url: impl Into<String>,
        timeout: std::time::Duration,
        retry: RetryPolicy,
    ) -> DeskResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DeskError::Internal(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            market,
            retry,
        })
    }

    /// Client for `market` using the endpoints and retry settings in `config`
    pub fn from_config(market: MarketType, config: &ExchangeConfig) -> DeskResult<Self> {
        let base_url = match market {
            MarketType::Spot => &config.spot_rest_url,
            MarketType::Perp => &config.perp_rest_url,
        };
        Self::new(market, base_url.as_str(), config.timeout(), RetryPolicy::from_config(config))
    }

    pub fn market(&self) -> MarketType {
        self.market
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn depth_path(&self) -> &'static str {
        match self.market {
            MarketType::Spot => "/api/v3/depth",
            MarketType::Perp => "/fapi/v1/depth",
        }
    }

    fn klines_path(&self) -> &'static str {
        match self.market {
            MarketType::Spot => "/api/v3/klines",
            MarketType::Perp => "/fapi/v1/klines",
        }
    }

    async fn get_json(&self, path: &str, params: &[(&str, String)]) -> DeskResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!("🌐 GET {} {:?}", url, params);

        let response = self.client.get(&url).query(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeskError::ApiResponse(format!("HTTP {}: {}", status.as_u16(), body)));
        }

        let json: Value = response.json().await?;
        Ok(json)
    }

    async fn fetch_order_book(&self, symbol: &str, limit: usize) -> DeskResult<OrderBook> {
        let params = [("symbol", symbol.to_string()), ("limit", limit.to_string())];
        let json = self.get_json(self.depth_path(), &params).await?;
        parse_depth_response(&json)
    }

    async fn fetch_klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
        end_time: Option<i64>,
    ) -> DeskResult<Vec<Candle>> {
        let mut params = vec![
            ("symbol", symbol.to_string()),
            ("interval", interval.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(end) = end_time {
            params.push(("endTime", end.to_string()));
        }

        let json = self.get_json(self.klines_path(), &params).await?;
        parse_klines_response(&json)
    }
}

#[async_trait]
impl MarketDataSource for BinanceClient {
    async fn order_book(&self, pair: &str, limit: usize) -> DeskResult<OrderBook> {
        let symbol = normalize_symbol(pair);
        self.retry
            .execute("order_book", || self.fetch_order_book(&symbol, limit))
            .await
    }

    async fn ohlcv(&self, pair: &str, timeframe: &str, limit: usize) -> DeskResult<Vec<Candle>> {
        if !VALID_INTERVALS.contains(&timeframe) {
            return Err(DeskError::invalid("timeframe", format!("unsupported interval '{}'", timeframe)));
        }

        let symbol = normalize_symbol(pair);
        let mut candles: Vec<Candle> = Vec::with_capacity(limit);
        let mut end_time: Option<i64> = None;

        // Walk backwards from now until `limit` candles are collected
        while candles.len() < limit {
            let batch_limit = (limit - candles.len()).min(MAX_KLINES_PER_REQUEST);
            let mut batch = self
                .retry
                .execute("ohlcv", || self.fetch_klines(&symbol, timeframe, batch_limit, end_time))
                .await?;

            let fetched = batch.len();
            if fetched == 0 {
                break;
            }

            end_time = Some(batch[0].timestamp_ms() - 1);
            batch.append(&mut candles);
            candles = batch;

            if fetched < batch_limit {
                break;
            }
        }

        if candles.len() < limit {
            warn!("⚠️  {} {}: requested {} candles, exchange returned {}", self.market, symbol, limit, candles.len());
        }

        candles.sort_by_key(|c| c.timestamp);
        candles.dedup_by_key(|c| c.timestamp);
        Ok(candles)
    }
}

/// "BTC/USDT" and "BTC/USDT:USDT" both become "BTCUSDT"
pub fn normalize_symbol(pair: &str) -> String {
    let base = pair.split(':').next().unwrap_or(pair);
    base.replace(['/', '-'], "").to_uppercase()
}

fn parse_number(value: &Value, what: &str) -> DeskResult<f64> {
    match value {
        Value::String(s) => s
            .parse::<f64>()
            .map_err(|_| DeskError::ApiParse(format!("Invalid {}: {}", what, s))),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| DeskError::ApiParse(format!("Invalid {}: {}", what, n))),
        other => Err(DeskError::ApiParse(format!("Invalid {}: {}", what, other))),
    }
}

fn parse_levels(json: &Value, side: &str) -> DeskResult<Vec<BookLevel>> {
    let rows = json[side]
        .as_array()
        .ok_or_else(|| DeskError::ApiParse(format!("Missing {} field", side)))?;

    rows.iter()
        .map(|row| {
            let pair = row
                .as_array()
                .filter(|r| r.len() >= 2)
                .ok_or_else(|| DeskError::ApiParse(format!("Invalid {} level format", side)))?;
            Ok(BookLevel::new(parse_number(&pair[0], "price")?, parse_number(&pair[1], "size")?))
        })
        .collect()
}

/// Parse a `depth` response into an order book, keeping exchange ordering
pub fn parse_depth_response(json: &Value) -> DeskResult<OrderBook> {
    let bids = parse_levels(json, "bids")?;
    let asks = parse_levels(json, "asks")?;

    // Futures responses carry a transaction time; spot responses carry none
    let timestamp = json
        .get("T")
        .or_else(|| json.get("E"))
        .and_then(Value::as_i64)
        .and_then(chrono::DateTime::from_timestamp_millis);

    Ok(OrderBook { bids, asks, timestamp })
}

/// Parse a `klines` response into candles, oldest first
pub fn parse_klines_response(json: &Value) -> DeskResult<Vec<Candle>> {
    let rows = json
        .as_array()
        .ok_or_else(|| DeskError::ApiParse("Invalid klines format".to_string()))?;

    let mut candles = Vec::with_capacity(rows.len());
    for row in rows {
        let fields = row
            .as_array()
            .filter(|r| r.len() >= 6)
            .ok_or_else(|| DeskError::ApiParse("Invalid candle format".to_string()))?;

        let open_time = fields[0]
            .as_i64()
            .ok_or_else(|| DeskError::ApiParse("Invalid timestamp".to_string()))?;

        candles.push(Candle::from_row(
            open_time,
            parse_number(&fields[1], "open price")?,
            parse_number(&fields[2], "high price")?,
            parse_number(&fields[3], "low price")?,
            parse_number(&fields[4], "close price")?,
            parse_number(&fields[5], "volume")?,
        )?);
    }

    candles.sort_by_key(|c| c.timestamp);
    Ok(candles)
}
