// Offline analytics commands (no exchange access)
use tracing::info;

use crypto_desk_sim::dashboard::run_execution;
use crypto_desk_sim::pricing::ndf::DEFAULT_CURVE_SPREAD_BP;
use crypto_desk_sim::{crypto_forward_curve, stress_scenarios, Config, DeskError, DeskResult, StressParams};

use crate::render;

pub fn show_forward_curve(
    spot: f64,
    r_annual: Option<f64>,
    q_annual: Option<f64>,
    tenors: &[u32],
    spread_bp: Option<f64>,
    config: &Config,
) -> DeskResult<()> {
    if !(spot > 0.0) || !spot.is_finite() {
        return Err(DeskError::invalid("spot", format!("must be a positive price, got {}", spot)));
    }
    if tenors.is_empty() {
        return Err(DeskError::invalid("tenors", "at least one tenor is required"));
    }

    let r = r_annual.unwrap_or(config.desk.r_annual);
    let q = q_annual.unwrap_or(config.desk.q_annual);
    let spread = spread_bp.unwrap_or(DEFAULT_CURVE_SPREAD_BP);

    info!("💱 Forward curve on spot {:.2} (r {:.4}, q {:.4}, {} bp)", spot, r, q, spread);
    render::print_curve(&crypto_forward_curve(spot, r, q, tenors, spread));
    Ok(())
}

pub fn simulate_execution(mid: f64, notional: Option<f64>, config: &Config) -> DeskResult<()> {
    let notional = notional.unwrap_or(config.desk.target_notional);
    if !(notional > 0.0) || !notional.is_finite() {
        return Err(DeskError::invalid("notional", "must be positive"));
    }

    info!(
        "⚙️  Simulating ${:.0} block on a {}-step path (seed {})",
        notional, config.simulation.path_len, config.simulation.seed
    );
    let report = run_execution(mid, notional, &config.simulation)?;

    println!("   Quantity: {:.6}", report.qty);
    render::print_execution("Sim", &report.vwap);
    render::print_execution("Sim", &report.twap);
    render::print_path("Sim", &report.path);
    Ok(())
}

pub fn show_stress(price: f64, qty: Option<f64>, config: &Config) -> DeskResult<()> {
    if !(price > 0.0) || !price.is_finite() {
        return Err(DeskError::invalid("price", format!("must be a positive price, got {}", price)));
    }

    let params = StressParams::from_config(&config.stress, qty.unwrap_or(1.0));
    info!(
        "🛡️  {} stress scenarios for {} units at {:.2}",
        params.scenario_count(),
        params.position_qty,
        price
    );
    render::print_stress(&stress_scenarios(price, &params));
    Ok(())
}
