// Crypto forward curve and NDF quoting

use serde::{Deserialize, Serialize};

use crate::error::{DeskError, DeskResult};

pub const DAYS_PER_YEAR: f64 = 365.0;
pub const DEFAULT_CURVE_SPREAD_BP: f64 = 20.0;
pub const DEFAULT_QUOTE_TENOR_DAYS: u32 = 7;
pub const DEFAULT_QUOTE_SPREAD_BP: f64 = 25.0;

/// Dealer quote for a single tenor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NdfQuote {
    pub forward: f64,
    pub bid: f64,
    pub ask: f64,
}

/// One row of a forward curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForwardPoint {
    pub tenor_days: u32,
    pub forward: f64,
    pub bid: f64,
    pub ask: f64,
}

impl ForwardPoint {
    pub fn quote(&self) -> NdfQuote {
        NdfQuote {
            forward: self.forward,
            bid: self.bid,
            ask: self.ask,
        }
    }
}

/// Forward quotes for each tenor, in input order.
///
/// Uses covered interest parity with continuous compounding on the funding
/// differential: `F = S * exp((r_dom - r_crypto) * days / 365)`. The dealer
/// spread is split evenly around the forward.
pub fn crypto_forward_curve(
    spot: f64,
    funding_dom: f64,
    funding_crypto: f64,
    tenors_days: &[u32],
    spread_bp: f64,
) -> Vec<ForwardPoint> {
    tenors_days
        .iter()
        .map(|&tenor_days| {
            let t = tenor_days as f64 / DAYS_PER_YEAR;
            let forward = spot * ((funding_dom - funding_crypto) * t).exp();
            let half_spread = forward * spread_bp / 10_000.0 / 2.0;
            ForwardPoint {
                tenor_days,
                forward,
                bid: forward - half_spread,
                ask: forward + half_spread,
            }
        })
        .collect()
}

/// Single-tenor NDF quote on a spot or perp mid
pub fn make_ndf_quote(
    spot: f64,
    r_annual: f64,
    q_annual: f64,
    tenor_days: u32,
    spread_bp: f64,
) -> DeskResult<NdfQuote> {
    crypto_forward_curve(spot, r_annual, q_annual, &[tenor_days], spread_bp)
        .first()
        .map(ForwardPoint::quote)
        .ok_or_else(|| DeskError::insufficient("forward curve produced no rows"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_differential_zero_spread_equals_spot() {
        let curve = crypto_forward_curve(100.0, 0.0, 0.0, &[30], 0.0);
        assert_eq!(curve.len(), 1);
        assert_eq!(curve[0].forward, 100.0);
        assert_eq!(curve[0].bid, 100.0);
        assert_eq!(curve[0].ask, 100.0);
    }

    #[test]
    fn test_curve_keeps_tenor_order() {
        let tenors = [180, 1, 30, 7];
        let curve = crypto_forward_curve(500_000.0, 0.05, -0.02, &tenors, DEFAULT_CURVE_SPREAD_BP);
        let out: Vec<u32> = curve.iter().map(|p| p.tenor_days).collect();
        assert_eq!(out, tenors);
    }

    #[test]
    fn test_forward_and_spread_math() {
        let curve = crypto_forward_curve(500_000.0, 0.05, -0.02, &[365], 20.0);
        let expected = 500_000.0 * 0.07f64.exp();
        assert!((curve[0].forward - expected).abs() < 1e-6);

        let width = curve[0].ask - curve[0].bid;
        assert!((width - expected * 0.002).abs() < 1e-6);
        assert!(curve[0].bid < curve[0].forward && curve[0].forward < curve[0].ask);
    }

    #[test]
    fn test_negative_differential_discounts() {
        let curve = crypto_forward_curve(100.0, -0.01, 0.04, &[90], 0.0);
        assert!(curve[0].forward < 100.0);
    }

    #[test]
    fn test_empty_tenor_list() {
        assert!(crypto_forward_curve(100.0, 0.05, 0.02, &[], 20.0).is_empty());
    }

    #[test]
    fn test_make_quote_matches_curve_row() {
        let quote = make_ndf_quote(64_000.0, 0.05, 0.02, DEFAULT_QUOTE_TENOR_DAYS, DEFAULT_QUOTE_SPREAD_BP).unwrap();
        let row = crypto_forward_curve(64_000.0, 0.05, 0.02, &[7], 25.0)[0];
        assert_eq!(quote, row.quote());
    }
}
