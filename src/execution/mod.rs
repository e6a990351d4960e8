// VWAP / TWAP block execution against a price path

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{DeskError, DeskResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Algorithm {
    Vwap,
    Twap,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Vwap => write!(f, "VWAP"),
            Algorithm::Twap => write!(f, "TWAP"),
        }
    }
}

/// One slice of the schedule, aligned with the input path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub price: f64,
    pub volume: Option<f64>, // VWAP only
    pub qty_exec: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub algorithm: Algorithm,
    pub avg_price: f64,
    pub slippage_bps: f64,
    pub schedule: Vec<ScheduleRow>,
}

impl ExecutionResult {
    pub fn executed_qty(&self) -> f64 {
        self.schedule.iter().map(|r| r.qty_exec).sum()
    }

    /// Running executed quantity, one entry per slice
    pub fn cumulative_qty(&self) -> Vec<f64> {
        self.schedule
            .iter()
            .scan(0.0, |acc, r| {
                *acc += r.qty_exec;
                Some(*acc)
            })
            .collect()
    }
}

/// Split `target_qty` across slices in proportion to traded volume.
///
/// Slippage is measured against the VWAP of the full series.
pub fn vwap_execute(
    prices: &Array1<f64>,
    volumes: &Array1<f64>,
    target_qty: f64,
) -> DeskResult<ExecutionResult> {
    check_common(prices, target_qty)?;
    if volumes.len() != prices.len() {
        return Err(DeskError::invalid(
            "volumes",
            format!("length {} does not match {} prices", volumes.len(), prices.len()),
        ));
    }

    let total_volume = volumes.sum();
    if !(total_volume > 0.0) {
        return Err(DeskError::insufficient(format!(
            "total volume must be positive, got {}",
            total_volume
        )));
    }

    let weights = volumes / total_volume;
    let schedule_qty = &weights * target_qty;
    let avg_price = (prices * &schedule_qty).sum() / schedule_qty.sum();
    let bench = (prices * volumes).sum() / total_volume;

    let schedule = prices
        .iter()
        .zip(volumes.iter())
        .zip(schedule_qty.iter())
        .map(|((&price, &volume), &qty_exec)| ScheduleRow {
            price,
            volume: Some(volume),
            qty_exec,
        })
        .collect();

    Ok(ExecutionResult {
        algorithm: Algorithm::Vwap,
        avg_price,
        slippage_bps: slippage_bps(avg_price, bench)?,
        schedule,
    })
}

/// Split `target_qty` evenly across slices, ignoring volume.
///
/// Slippage is measured against the simple mean of the path.
pub fn twap_execute(prices: &Array1<f64>, target_qty: f64) -> DeskResult<ExecutionResult> {
    check_common(prices, target_qty)?;

    let n = prices.len();
    let schedule_qty = Array1::from_elem(n, target_qty / n as f64);
    let avg_price = (prices * &schedule_qty).sum() / target_qty;
    let bench = prices.sum() / n as f64;

    let schedule = prices
        .iter()
        .zip(schedule_qty.iter())
        .map(|(&price, &qty_exec)| ScheduleRow {
            price,
            volume: None,
            qty_exec,
        })
        .collect();

    Ok(ExecutionResult {
        algorithm: Algorithm::Twap,
        avg_price,
        slippage_bps: slippage_bps(avg_price, bench)?,
        schedule,
    })
}

/// Deviation of `avg_price` from `benchmark`, in basis points
pub fn slippage_bps(avg_price: f64, benchmark: f64) -> DeskResult<f64> {
    if benchmark == 0.0 || !benchmark.is_finite() {
        return Err(DeskError::invalid("benchmark", format!("cannot measure slippage against {}", benchmark)));
    }
    Ok((avg_price - benchmark) / benchmark * 10_000.0)
}

fn check_common(prices: &Array1<f64>, target_qty: f64) -> DeskResult<()> {
    if prices.is_empty() {
        return Err(DeskError::insufficient("price path is empty"));
    }
    if target_qty == 0.0 || !target_qty.is_finite() {
        return Err(DeskError::invalid("target_qty", "must be finite and non-zero"));
    }
    Ok(())
}
