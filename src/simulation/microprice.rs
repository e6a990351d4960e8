// Synthetic micro-price paths and volume draws for execution simulation

use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::error::{DeskError, DeskResult};

/// Seeded multiplicative random walk starting from `mid`.
///
/// `path[i] = mid * Π_{k<=i} (1 + shock_k)` with `shock_k ~ N(0, sigma_bp / 10_000)`.
/// Shocks compound on the current level, so dispersion grows with price
/// (log-normal style) rather than staying constant as in an additive walk.
/// Prices are not clamped at zero.
pub fn microprice_path(mid: f64, n: usize, sigma_bp: f64, seed: u64) -> DeskResult<Array1<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    microprice_path_with_rng(mid, n, sigma_bp, &mut rng)
}

/// Same walk as [`microprice_path`], drawing from a caller-owned generator
pub fn microprice_path_with_rng<R: Rng + ?Sized>(
    mid: f64,
    n: usize,
    sigma_bp: f64,
    rng: &mut R,
) -> DeskResult<Array1<f64>> {
    if !mid.is_finite() {
        return Err(DeskError::invalid("mid", "must be a finite price"));
    }
    if !sigma_bp.is_finite() || sigma_bp < 0.0 {
        return Err(DeskError::invalid("sigma_bp", "must be finite and non-negative"));
    }

    let shocks = Normal::new(0.0, sigma_bp / 10_000.0)
        .map_err(|e| DeskError::invalid("sigma_bp", e.to_string()))?;

    let mut level = mid;
    let mut path = Vec::with_capacity(n);
    for _ in 0..n {
        level *= 1.0 + shocks.sample(&mut *rng);
        path.push(level);
    }

    Ok(Array1::from_vec(path))
}

/// `n` integer volumes drawn uniformly from `[low, high)`
pub fn synthetic_volumes(n: usize, low: u32, high: u32, seed: u64) -> DeskResult<Array1<f64>> {
    if low >= high {
        return Err(DeskError::invalid("volume range", format!("empty range [{}, {})", low, high)));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    Ok((0..n).map(|_| rng.gen_range(low..high) as f64).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_is_reproducible() {
        let a = microprice_path(30_000.0, 60, 30.0, 42).unwrap();
        let b = microprice_path(30_000.0, 60, 30.0, 42).unwrap();
        assert_eq!(a.len(), 60);
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_diverge() {
        let a = microprice_path(100.0, 20, 30.0, 1).unwrap();
        let b = microprice_path(100.0, 20, 30.0, 2).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_zero_sigma_is_flat() {
        let path = microprice_path(250.0, 5, 0.0, 7).unwrap();
        assert!(path.iter().all(|&p| p == 250.0));
    }

    #[test]
    fn test_empty_path() {
        let path = microprice_path(100.0, 0, 30.0, 42).unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn test_negative_sigma_rejected() {
        assert!(matches!(
            microprice_path(100.0, 10, -1.0, 42),
            Err(DeskError::InvalidParameter(_, _))
        ));
    }

    #[test]
    fn test_path_compounds_shocks() {
        // Replay the draws by hand and rebuild the running product
        let mut rng = StdRng::seed_from_u64(9);
        let normal = Normal::new(0.0, 0.003).unwrap();
        let shocks: Vec<f64> = (0..4).map(|_| normal.sample(&mut rng)).collect();

        let path = microprice_path(100.0, 4, 30.0, 9).unwrap();
        let mut expected = 100.0;
        for (i, s) in shocks.iter().enumerate() {
            expected *= 1.0 + s;
            assert!((path[i] - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_volumes_in_range_and_reproducible() {
        let v = synthetic_volumes(60, 1, 20, 42).unwrap();
        assert_eq!(v.len(), 60);
        assert!(v.iter().all(|&x| (1.0..20.0).contains(&x) && x.fract() == 0.0));
        assert_eq!(v, synthetic_volumes(60, 1, 20, 42).unwrap());
        assert!(synthetic_volumes(5, 3, 3, 42).is_err());
    }
}
