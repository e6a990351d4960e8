//! Dashboard report assembly
//!
//! Wires exchange data through the calculation library for one market at a
//! time. Rendering lives in the `desk` binary; everything here is plain data
//! so it can be printed, serialized or asserted on in tests.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::clients::{MarketDataSource, MarketType};
use crate::config::{Config, DeskDefaults, SimulationConfig};
use crate::error::{DeskError, DeskResult};
use crate::execution::{twap_execute, vwap_execute, ExecutionResult};
use crate::market_data::{closes, Candle, DepthRow};
use crate::pricing::{make_ndf_quote, NdfQuote};
use crate::risk::{historical_var, pct_change, rolling_sum, stress_scenarios, StressParams, StressRow};
use crate::simulation::{microprice_path, synthetic_volumes};

/// Which markets a dashboard pass covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketSelection {
    Spot,
    Perp,
    Both,
}

impl MarketSelection {
    pub fn markets(&self) -> Vec<MarketType> {
        match self {
            MarketSelection::Spot => vec![MarketType::Spot],
            MarketSelection::Perp => vec![MarketType::Perp],
            MarketSelection::Both => vec![MarketType::Spot, MarketType::Perp],
        }
    }

    pub fn includes(&self, market: MarketType) -> bool {
        self.markets().contains(&market)
    }
}

/// Slider values supplied by the user for one pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeskParams {
    pub r_annual: f64,
    pub q_annual: f64,
    pub spread_bp: f64,
    pub target_notional: f64,
    pub tenor_days: u32,
    pub var_alpha: f64,
}

impl DeskParams {
    pub fn from_defaults(defaults: &DeskDefaults) -> Self {
        Self {
            r_annual: defaults.r_annual,
            q_annual: defaults.q_annual,
            spread_bp: defaults.spread_bp,
            target_notional: defaults.target_notional,
            tenor_days: defaults.tenor_days,
            var_alpha: defaults.var_alpha,
        }
    }

    /// Rates may be negative; they only need to be finite
    pub fn validate(&self) -> DeskResult<()> {
        for (name, value) in [
            ("r_annual", self.r_annual),
            ("q_annual", self.q_annual),
            ("spread_bp", self.spread_bp),
        ] {
            if !value.is_finite() {
                return Err(DeskError::invalid(name, "must be finite"));
            }
        }
        if !(self.target_notional > 0.0) || !self.target_notional.is_finite() {
            return Err(DeskError::invalid("target_notional", "must be positive"));
        }
        if !(self.var_alpha > 0.0 && self.var_alpha < 1.0) {
            return Err(DeskError::invalid("var_alpha", "must lie in (0, 1)"));
        }
        Ok(())
    }
}

impl Default for DeskParams {
    fn default() -> Self {
        Self::from_defaults(&DeskDefaults::default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub qty: f64,
    pub path: Vec<f64>,
    pub vwap: ExecutionResult,
    pub twap: ExecutionResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    pub var_alpha: f64,
    pub var: f64,
    pub return_count: usize,
    pub stress: Vec<StressRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketReport {
    pub market: MarketType,
    pub pair: String,
    pub mid: f64,
    pub spread: f64,
    pub depth: Vec<DepthRow>,
    pub ndf: NdfQuote,
    pub execution: ExecutionReport,
    pub risk: RiskReport,
}

/// Simulate a block trade of `target_notional` worth at `mid` with both algorithms
pub fn run_execution(mid: f64, target_notional: f64, sim: &SimulationConfig) -> DeskResult<ExecutionReport> {
    if !(mid > 0.0) || !mid.is_finite() {
        return Err(DeskError::invalid("mid", format!("must be a positive price, got {}", mid)));
    }

    let qty = target_notional / mid;
    let path = microprice_path(mid, sim.path_len, sim.sigma_bp, sim.seed)?;
    let volumes = synthetic_volumes(sim.path_len, sim.volume_min, sim.volume_max, sim.seed)?;

    let vwap = vwap_execute(&path, &volumes, qty)?;
    let twap = twap_execute(&path, qty)?;
    debug!(
        "⚙️  qty {:.6}: VWAP {:.2} ({:.1} bp), TWAP {:.2} ({:.1} bp)",
        qty, vwap.avg_price, vwap.slippage_bps, twap.avg_price, twap.slippage_bps
    );

    Ok(ExecutionReport {
        qty,
        path: path.to_vec(),
        vwap,
        twap,
    })
}

/// Hourly close-to-close returns summed over `window` bars
pub fn windowed_returns(candles: &[Candle], window: usize) -> Vec<f64> {
    rolling_sum(&pct_change(&closes(candles)), window)
}

/// VaR over the candle history plus the stress grid at `mid`
pub fn run_risk(candles: &[Candle], mid: f64, params: &DeskParams, config: &Config) -> DeskResult<RiskReport> {
    if !(mid > 0.0) || !mid.is_finite() {
        return Err(DeskError::invalid("mid", format!("must be a positive price, got {}", mid)));
    }

    let returns = windowed_returns(candles, config.desk.var_window);
    let var = historical_var(&returns, params.var_alpha, params.target_notional)?;

    let stress_params = StressParams::from_config(&config.stress, params.target_notional / mid);
    let stress = stress_scenarios(mid, &stress_params);

    Ok(RiskReport {
        var_alpha: params.var_alpha,
        var,
        return_count: returns.len(),
        stress,
    })
}

/// Full dashboard pass for one market
pub async fn build_market_report<S>(
    source: &S,
    market: MarketType,
    pair: &str,
    params: &DeskParams,
    config: &Config,
) -> DeskResult<MarketReport>
where
    S: MarketDataSource + ?Sized,
{
    params.validate()?;
    info!("📊 Building {} report for {}", market, pair);

    let book = source.order_book(pair, config.exchange.book_limit).await?;
    let mid = book.mid()?;
    let spread = book.spread()?;
    let depth = book.depth_snapshot(config.desk.depth);

    let ndf = make_ndf_quote(mid, params.r_annual, params.q_annual, params.tenor_days, params.spread_bp)?;
    let execution = run_execution(mid, params.target_notional, &config.simulation)?;

    let candles = source
        .ohlcv(pair, &config.exchange.candle_timeframe, config.exchange.candle_limit)
        .await?;
    info!("🕯️  {} candles loaded for {} {}", candles.len(), market, pair);
    let risk = run_risk(&candles, mid, params, config)?;

    Ok(MarketReport {
        market,
        pair: pair.to_string(),
        mid,
        spread,
        depth,
        ndf,
        execution,
        risk,
    })
}
