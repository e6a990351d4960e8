// Return series helpers for VaR inputs

/// Simple returns between consecutive closes; one shorter than the input
pub fn pct_change(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .map(|w| w[1] / w[0] - 1.0)
        .collect()
}

/// Sums over each full trailing window. Partial leading windows are dropped.
pub fn rolling_sum(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 {
        return Vec::new();
    }
    values.windows(window).map(|w| w.iter().sum()).collect()
}
