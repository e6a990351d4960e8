// Plain-text rendering for the desk dashboard

use crypto_desk_sim::{
    BookSample, Candle, DepthRow, ExecutionResult, ForwardPoint, MarketReport, NdfQuote, Side, StressRow,
};

const SPARK_TICKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

pub fn print_top_of_book(label: &str, mid: f64, spread: f64) {
    println!("   Mid price ({}): {:.2}", label, mid);
    println!("   Spread ({}):    {:.2}", label, spread);
}

/// Depth table with a size bar per level, bids then asks
pub fn print_depth(rows: &[DepthRow]) {
    let max_size = rows.iter().map(|r| r.size).fold(0.0_f64, f64::max);
    println!("   {:>5} {:>14} {:>12}", "side", "price", "size");
    for row in rows {
        let width = if max_size > 0.0 { (row.size / max_size * 30.0).round() as usize } else { 0 };
        let bar = match row.side {
            Side::Bid => "▓".repeat(width),
            Side::Ask => "░".repeat(width),
        };
        println!("   {:>5} {:>14.2} {:>12.5} {}", row.side.to_string(), row.price, row.size, bar);
    }
}

pub fn print_candles(candles: &[Candle]) {
    println!("   {:<20} {:>12} {:>12} {:>12} {:>12} {:>14}", "time (UTC)", "open", "high", "low", "close", "volume");
    for c in candles {
        println!(
            "   {:<20} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>14.4}",
            c.timestamp.format("%Y-%m-%d %H:%M"),
            c.open,
            c.high,
            c.low,
            c.close,
            c.volume
        );
    }
}

pub fn print_samples(samples: &[BookSample]) {
    println!("   {:<24} {:>6} {:>14} {:>10}", "timestamp", "market", "mid", "spread");
    for s in samples {
        println!(
            "   {:<24} {:>6} {:>14.2} {:>10.4}",
            s.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            s.market.to_string(),
            s.mid,
            s.spread
        );
    }
}

pub fn print_curve(curve: &[ForwardPoint]) {
    println!("   {:>6} {:>16} {:>16} {:>16}", "tenor", "forward", "bid", "ask");
    for p in curve {
        println!("   {:>5}d {:>16.2} {:>16.2} {:>16.2}", p.tenor_days, p.forward, p.bid, p.ask);
    }
}

pub fn print_ndf(label: &str, quote: &NdfQuote) {
    println!(
        "   {} Forward: {:.2} | Bid: {:.2} | Ask: {:.2}",
        label, quote.forward, quote.bid, quote.ask
    );
}

pub fn print_execution(label: &str, result: &ExecutionResult) {
    println!(
        "   {} {} avg: {:.2} | Slippage: {:.1} bp | Filled: {:.6}",
        label,
        result.algorithm,
        result.avg_price,
        result.slippage_bps,
        result.executed_qty()
    );
}

/// One-line sparkline of a price path
pub fn sparkline(values: &[f64]) -> String {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = hi - lo;

    values
        .iter()
        .map(|v| {
            let idx = if range > 0.0 { ((v - lo) / range * 7.0).round() as usize } else { 0 };
            SPARK_TICKS[idx.min(7)]
        })
        .collect()
}

pub fn print_path(label: &str, path: &[f64]) {
    if let (Some(first), Some(last)) = (path.first(), path.last()) {
        println!("   {} microprice {:.2} → {:.2}", label, first, last);
        println!("   {}", sparkline(path));
    }
}

pub fn print_stress(rows: &[StressRow]) {
    println!("   {:>7} {:>6} {:>6} {:>16} {:>14}", "shock", "fees", "vol", "shocked price", "net pnl");
    for r in rows {
        println!(
            "   {:>6.1}% {:>6.2} {:>6.2} {:>16.2} {:>14.2}",
            r.shock_pct * 100.0,
            r.fee_multiplier,
            r.vol_multiplier,
            r.shocked_price,
            r.net_pnl
        );
    }
}

pub fn print_report(report: &MarketReport) {
    let label = match report.market {
        crypto_desk_sim::MarketType::Spot => "Spot",
        crypto_desk_sim::MarketType::Perp => "Perp",
    };

    println!();
    println!("━━━━━━━━━━ {} {} ━━━━━━━━━━", label, report.pair);
    println!("📚 Order Book Depth");
    print_depth(&report.depth);
    print_top_of_book(label, report.mid, report.spread);

    println!();
    println!("💱 OTC NDF Quote");
    print_ndf(label, &report.ndf);

    println!();
    println!("⚙️  Block Trade Execution (qty {:.6})", report.execution.qty);
    print_execution(label, &report.execution.vwap);
    print_execution(label, &report.execution.twap);
    print_path(label, &report.execution.path);

    println!();
    println!("🛡️  Risk Metrics");
    println!(
        "   {} {:.0}% VaR: ${:.0} ({} windowed returns)",
        label,
        report.risk.var_alpha * 100.0,
        report.risk.var,
        report.risk.return_count
    );
    println!("   {} Stress Scenarios", label);
    print_stress(&report.risk.stress);
}
