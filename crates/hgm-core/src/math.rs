//! Mathematical helpers shared across the identification pipeline.
//!
//! - [`binomial`] - Binomial coefficient, used by the harmonic combination matrix
//! - [`db_to_linear`] / [`linear_to_db`] - Level conversions for kernel comparison

/// Binomial coefficient `C(n, k)` as a float.
///
/// Returns 0 when `k > n`. Uses the multiplicative form so intermediate
/// values stay small for the degrees a Hammerstein model uses.
///
/// # Example
/// ```rust
/// use hgm_core::binomial;
///
/// assert_eq!(binomial(5, 2), 10.0);
/// assert_eq!(binomial(3, 0), 1.0);
/// assert_eq!(binomial(2, 3), 0.0);
/// ```
pub fn binomial(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    // C(n, k) == C(n, n - k); iterate over the shorter side
    let k = k.min(n - k);
    let mut result = 1.0f64;
    for i in 0..k {
        result = result * (n - i) as f64 / (i + 1) as f64;
    }
    result.round()
}

/// Convert decibels to linear gain.
#[inline]
pub fn db_to_linear(db: f64) -> f64 {
    10.0f64.powf(db / 20.0)
}

/// Convert linear gain to decibels.
///
/// Input is floored at `1e-12` so silence maps to -240 dB instead of -inf.
#[inline]
pub fn linear_to_db(linear: f64) -> f64 {
    20.0 * linear.max(1e-12).log10()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binomial_pascal_row() {
        let row: Vec<f64> = (0..=6).map(|k| binomial(6, k)).collect();
        assert_eq!(row, vec![1.0, 6.0, 15.0, 20.0, 15.0, 6.0, 1.0]);
    }

    #[test]
    fn binomial_out_of_range_is_zero() {
        assert_eq!(binomial(0, 1), 0.0);
        assert_eq!(binomial(4, 5), 0.0);
    }

    #[test]
    fn db_roundtrip() {
        for db in [-60.0, -6.0, 0.0, 12.0] {
            assert!((linear_to_db(db_to_linear(db)) - db).abs() < 1e-9);
        }
    }
}
