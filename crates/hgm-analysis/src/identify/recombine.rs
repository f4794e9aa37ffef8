//! Harmonic-to-kernel recombination for sine-sweep identification
//!
//! A power `x^n` driven by a sine produces harmonics `n, n-2, n-4, …`, so
//! every measured harmonic mixes several branches. The combination matrix
//! `A` maps branch kernels to measured harmonics:
//!
//! ```text
//! A[m][n] = (-1)^(2(n+1) - ⌊m/2⌋) / 2^n · C(n+1, (n-m)/2)   for n ≥ m, n+m even
//! ```
//!
//! and `0` elsewhere (0-based indices). `A` is upper triangular with a
//! non-zero diagonal. Even powers produce cosine harmonics, which a sine
//! inverse filter returns in quadrature, so the odd rows of `A⁻¹` are
//! rotated by `j` before use.

use hgm_core::{Complex, Signal, Spectrum, binomial};
use nalgebra::DMatrix;
use rayon::prelude::*;

use crate::error::{IdentificationError, Result};
use crate::fft;

/// Build the `branches × branches` combination matrix.
pub fn combination_matrix(branches: usize) -> DMatrix<Complex<f64>> {
    DMatrix::from_fn(branches, branches, |m, n| {
        if n >= m && (n + m) % 2 == 0 {
            let exponent = 2 * (n + 1) - m / 2;
            let sign = if exponent % 2 == 0 { 1.0 } else { -1.0 };
            let value = sign / 2f64.powi(n as i32) * binomial(n + 1, (n - m) / 2);
            Complex::new(value, 0.0)
        } else {
            Complex::new(0.0, 0.0)
        }
    })
}

/// Invert a combination matrix.
pub fn invert(matrix: DMatrix<Complex<f64>>) -> Result<DMatrix<Complex<f64>>> {
    let branches = matrix.nrows();
    matrix
        .try_inverse()
        .ok_or(IdentificationError::SingularMatrix { branches })
}

/// `A⁻¹` with every odd-indexed row multiplied by `j`.
pub fn phase_corrected_inverse(branches: usize) -> Result<DMatrix<Complex<f64>>> {
    let mut inverse = invert(combination_matrix(branches))?;
    let j = Complex::new(0.0, 1.0);
    for row in (1..branches).step_by(2) {
        for col in 0..branches {
            inverse[(row, col)] *= j;
        }
    }
    Ok(inverse)
}

/// Turn per-harmonic spectra into per-branch kernels.
///
/// `harmonics[c]` is the spectrum of harmonic `c + 1`; all must share bin
/// layout and channel count. Kernel `r` (power degree `r + 1`) is
/// `Σ_c A⁻¹[r][c] · harmonics[c]`, transformed back to the time domain.
pub fn recombine(harmonics: &[Spectrum], branches: usize) -> Result<Vec<Signal>> {
    if harmonics.len() != branches {
        return Err(IdentificationError::InputMismatch(format!(
            "{} harmonic spectra for {} branches",
            harmonics.len(),
            branches
        )));
    }
    let Some(first) = harmonics.first() else {
        return Err(IdentificationError::EmptyBranchSelection);
    };
    let inverse = phase_corrected_inverse(branches)?;

    tracing::debug!(branches, bins = first.len(), "recombining harmonics");

    (0..branches)
        .into_par_iter()
        .map(|row| -> Result<Signal> {
            let mut acc = first.zeros_like();
            for (col, harmonic) in harmonics.iter().enumerate() {
                acc.add_scaled(harmonic, inverse[(row, col)])?;
            }
            Ok(fft::inverse(&acc)?)
        })
        .collect()
}
