// Single-position risk: historical VaR, stress grid, inventory PnL

pub mod returns;

use serde::{Deserialize, Serialize};

use crate::config::StressConfig;
use crate::error::{DeskError, DeskResult};

pub use returns::{pct_change, rolling_sum};

const QUANTILE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PnLReport {
    pub realized: f64,
    pub unrealized: f64,
    pub total: f64,
    pub inventory: f64,
}

/// Mark an average-cost inventory to `current_price`. Nothing is realized.
pub fn inventory_pnl(trade_prices: &[f64], trade_qtys: &[f64], current_price: f64) -> DeskResult<PnLReport> {
    if trade_prices.len() != trade_qtys.len() {
        return Err(DeskError::invalid(
            "trade_qtys",
            format!("length {} does not match {} prices", trade_qtys.len(), trade_prices.len()),
        ));
    }

    let qty: f64 = trade_qtys.iter().sum();
    let notional: f64 = trade_prices.iter().zip(trade_qtys).map(|(p, q)| p * q).sum();
    let cost = notional / qty.max(1e-9);
    let unrealized = (current_price - cost) * qty;

    Ok(PnLReport {
        realized: 0.0,
        unrealized,
        total: unrealized,
        inventory: qty,
    })
}

/// Historical-simulation VaR, reported as a positive loss amount.
///
/// Takes the empirical left-tail quantile at index `floor((1 - alpha) * n)`
/// of the sorted finite returns. On short series that index is 0, i.e. the
/// single worst observation.
pub fn historical_var(returns: &[f64], alpha: f64, notional: f64) -> DeskResult<f64> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(DeskError::invalid("alpha", format!("must lie in (0, 1), got {}", alpha)));
    }
    if !notional.is_finite() {
        return Err(DeskError::invalid("notional", "must be finite"));
    }

    let mut sorted: Vec<f64> = returns.iter().copied().filter(|r| !r.is_nan()).collect();
    if sorted.is_empty() {
        return Err(DeskError::insufficient("return series is empty"));
    }
    sorted.sort_by(f64::total_cmp);

    // (1 - 0.8) * 5 evaluates to 0.999..., which would floor to the wrong rank
    let rank = (1.0 - alpha) * sorted.len() as f64 + QUANTILE_EPSILON;
    let idx = (rank.floor() as usize).min(sorted.len() - 1);
    Ok(sorted[idx].abs() * notional)
}

/// Inputs for [`stress_scenarios`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressParams {
    pub shocks_pct: Vec<f64>,
    pub position_qty: f64,
    pub base_fee_bp: f64,
    pub fee_multipliers: Vec<f64>,
    pub vol_multipliers: Vec<f64>,
    pub slippage_bp: f64,
}

impl StressParams {
    pub fn from_config(config: &StressConfig, position_qty: f64) -> Self {
        Self {
            shocks_pct: config.shocks_pct.clone(),
            position_qty,
            base_fee_bp: config.base_fee_bp,
            fee_multipliers: config.fee_multipliers.clone(),
            vol_multipliers: config.vol_multipliers.clone(),
            slippage_bp: config.slippage_bp,
        }
    }

    pub fn with_position_qty(mut self, qty: f64) -> Self {
        self.position_qty = qty;
        self
    }

    pub fn scenario_count(&self) -> usize {
        self.shocks_pct.len() * self.fee_multipliers.len() * self.vol_multipliers.len()
    }
}

impl Default for StressParams {
    fn default() -> Self {
        Self::from_config(&StressConfig::default(), 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StressRow {
    pub shock_pct: f64,
    pub fee_multiplier: f64,
    pub vol_multiplier: f64,
    pub shocked_price: f64,
    pub net_pnl: f64,
}

/// Net PnL of the position under every (shock, fee, vol) combination.
///
/// Rows come out shock-major, then fee multiplier, then vol multiplier.
/// Fees scale with the fee multiplier; slippage scales with the vol multiplier.
pub fn stress_scenarios(current_price: f64, params: &StressParams) -> Vec<StressRow> {
    let qty = params.position_qty;
    let mut rows = Vec::with_capacity(params.scenario_count());

    for &shock in &params.shocks_pct {
        let shocked_price = current_price * (1.0 + shock);
        let pnl = (shocked_price - current_price) * qty;

        for &fee_mult in &params.fee_multipliers {
            let fees = (params.base_fee_bp / 10_000.0) * shocked_price * qty * fee_mult;

            for &vol_mult in &params.vol_multipliers {
                let slippage_cost = (params.slippage_bp / 10_000.0) * shocked_price * qty * vol_mult;
                rows.push(StressRow {
                    shock_pct: shock,
                    fee_multiplier: fee_mult,
                    vol_multiplier: vol_mult,
                    shocked_price,
                    net_pnl: pnl - fees - slippage_cost,
                });
            }
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_picks_empirical_quantile() {
        let returns = [0.04, -0.01, -0.05, 0.02, -0.03];
        let var = historical_var(&returns, 0.8, 1000.0).unwrap();
        assert!((var - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_var_short_series_uses_worst_return() {
        let var = historical_var(&[-0.02, 0.01, -0.07], 0.99, 100.0).unwrap();
        assert!((var - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_var_drops_missing_values() {
        let var = historical_var(&[f64::NAN, -0.04, 0.01], 0.5, 100.0).unwrap();
        assert!((var - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_var_rejects_bad_inputs() {
        assert!(matches!(historical_var(&[], 0.99, 1.0), Err(DeskError::InsufficientData(_))));
        assert!(matches!(historical_var(&[f64::NAN], 0.99, 1.0), Err(DeskError::InsufficientData(_))));
        assert!(matches!(historical_var(&[-0.1], 1.0, 1.0), Err(DeskError::InvalidParameter(_, _))));
        assert!(matches!(historical_var(&[-0.1], 0.0, 1.0), Err(DeskError::InvalidParameter(_, _))));
    }

    #[test]
    fn test_stress_isolated_price_pnl() {
        let params = StressParams {
            shocks_pct: vec![-0.1, 0.1],
            position_qty: 1.0,
            base_fee_bp: 0.0,
            fee_multipliers: vec![1.0],
            vol_multipliers: vec![1.0],
            slippage_bp: 0.0,
        };

        let rows = stress_scenarios(100.0, &params);
        assert_eq!(rows.len(), 2);
        assert!((rows[0].shocked_price - 90.0).abs() < 1e-9);
        assert!((rows[0].net_pnl + 10.0).abs() < 1e-9);
        assert!((rows[1].shocked_price - 110.0).abs() < 1e-9);
        assert!((rows[1].net_pnl - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_stress_default_grid_order() {
        let params = StressParams::default();
        let rows = stress_scenarios(50_000.0, &params);
        assert_eq!(rows.len(), 36);

        // vol multiplier cycles fastest, shock slowest
        assert_eq!((rows[0].shock_pct, rows[0].fee_multiplier, rows[0].vol_multiplier), (-0.2, 1.0, 1.0));
        assert_eq!((rows[1].shock_pct, rows[1].fee_multiplier, rows[1].vol_multiplier), (-0.2, 1.0, 1.5));
        assert_eq!((rows[3].shock_pct, rows[3].fee_multiplier, rows[3].vol_multiplier), (-0.2, 1.5, 1.0));
        assert_eq!(rows[9].shock_pct, -0.1);
        assert_eq!(rows[35].shock_pct, 0.2);
    }

    #[test]
    fn test_stress_costs() {
        let params = StressParams {
            shocks_pct: vec![0.0],
            position_qty: 2.0,
            base_fee_bp: 10.0,
            fee_multipliers: vec![2.0],
            vol_multipliers: vec![1.5],
            slippage_bp: 5.0,
        };

        let rows = stress_scenarios(1000.0, &params);
        // fees 0.001*1000*2*2 = 4, slippage 0.0005*1000*2*1.5 = 1.5
        assert!((rows[0].net_pnl + 5.5).abs() < 1e-9);
    }

    #[test]
    fn test_inventory_pnl() {
        let report = inventory_pnl(&[100.0, 110.0], &[1.0, 1.0], 120.0).unwrap();
        assert_eq!(report.inventory, 2.0);
        assert!((report.unrealized - 30.0).abs() < 1e-9);
        assert_eq!(report.total, report.unrealized);
        assert_eq!(report.realized, 0.0);

        assert!(inventory_pnl(&[100.0], &[], 120.0).is_err());
    }
}
