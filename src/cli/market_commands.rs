// Live market data commands (need exchange access)
use std::time::Duration;
use tracing::{info, warn};

use crypto_desk_sim::market_data::{poll_order_book, poll_order_books};
use crypto_desk_sim::{
    build_market_report, BinanceClient, Config, DeskParams, DeskResult, MarketDataSource, MarketSelection,
    MarketType, Spinner,
};

use crate::render;

pub async fn show_book(market: MarketType, limit: Option<usize>, depth: Option<usize>, config: &Config) -> DeskResult<()> {
    let client = BinanceClient::from_config(market, &config.exchange)?;
    let pair = config.exchange.pair_for(market);
    let limit = limit.unwrap_or(config.exchange.book_limit);
    let depth = depth.unwrap_or(config.desk.depth);

    info!("📚 Fetching {} order book for {} (limit {})", market, pair, limit);
    let spinner = Spinner::new(&format!("Loading {} book...", pair));
    let book = match client.order_book(pair, limit).await {
        Ok(book) => {
            spinner.finish(&format!("{} bids / {} asks", book.bids.len(), book.asks.len()));
            book
        }
        Err(e) => {
            spinner.finish_with_error(&e.to_string());
            return Err(e);
        }
    };

    render::print_depth(&book.depth_snapshot(depth));
    render::print_top_of_book(&market.to_string(), book.mid()?, book.spread()?);
    Ok(())
}

pub async fn show_candles(
    market: MarketType,
    timeframe: Option<String>,
    limit: usize,
    config: &Config,
) -> DeskResult<()> {
    let client = BinanceClient::from_config(market, &config.exchange)?;
    let pair = config.exchange.pair_for(market);
    let timeframe = timeframe.unwrap_or_else(|| config.exchange.candle_timeframe.clone());

    info!("🕯️  Fetching {} {} candles for {} ({})", limit, timeframe, pair, market);
    let candles = client.ohlcv(pair, &timeframe, limit).await?;
    render::print_candles(&candles);
    Ok(())
}

pub async fn poll_markets(
    selection: MarketSelection,
    samples: usize,
    interval_ms: u64,
    config: &Config,
) -> DeskResult<()> {
    let interval = Duration::from_millis(interval_ms);
    let limit = config.exchange.book_limit;
    let spinner = Spinner::new(&format!("Polling {} samples every {} ms...", samples, interval_ms));

    let result = match selection {
        MarketSelection::Both => {
            let spot = BinanceClient::from_config(MarketType::Spot, &config.exchange)?;
            let perp = BinanceClient::from_config(MarketType::Perp, &config.exchange)?;
            poll_order_books(
                &spot,
                &perp,
                config.exchange.pair_for(MarketType::Spot),
                config.exchange.pair_for(MarketType::Perp),
                limit,
                samples,
                interval,
            )
            .await
        }
        single => {
            let market = single.markets()[0];
            let client = BinanceClient::from_config(market, &config.exchange)?;
            poll_order_book(&client, market, config.exchange.pair_for(market), limit, samples, interval).await
        }
    };

    match result {
        Ok(rows) => {
            spinner.finish(&format!("Collected {} snapshots", rows.len()));
            render::print_samples(&rows);
            Ok(())
        }
        Err(e) => {
            spinner.finish_with_error(&e.to_string());
            Err(e)
        }
    }
}

pub async fn run_dashboard(selection: MarketSelection, params: DeskParams, config: &Config) -> DeskResult<()> {
    info!("🖥️  Crypto Derivatives Liquidity & Risk Simulator");
    info!(
        "   r {:.2} | q {:.2} | spread {} bp | notional ${:.0}",
        params.r_annual, params.q_annual, params.spread_bp, params.target_notional
    );
    params.validate()?;

    let spinner = Spinner::new("Loading market data...");
    let mut reports = Vec::new();
    for market in selection.markets() {
        let client = BinanceClient::from_config(market, &config.exchange)?;
        let pair = config.exchange.pair_for(market);
        spinner.update(&format!("Loading {} {}...", market, pair));

        match build_market_report(&client, market, pair, &params, config).await {
            Ok(report) => reports.push(report),
            Err(e) => {
                spinner.finish_with_error(&format!("{} failed: {}", market, e));
                return Err(e);
            }
        }
    }
    spinner.finish(&format!("{} market(s) loaded", reports.len()));

    if reports.is_empty() {
        warn!("⚠️  No markets selected");
    }
    for report in &reports {
        render::print_report(report);
    }
    Ok(())
}
