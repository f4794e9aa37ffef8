//! Integer-factor resampling for aliasing compensation.
//!
//! A nonlinearity of degree `n` widens the bandwidth of its input by `n`.
//! Evaluating it at `n` times the sampling rate and decimating afterwards
//! keeps the new harmonics from folding back into the audio band.
//!
//! Both directions use a windowed-sinc lowpass with a Blackman window:
//!   `h[n] = sinc(cutoff * (n - M/2)) * w[n]`
//! normalized to unity DC gain.
//!
//! Reference: P. P. Vaidyanathan, *Multirate Systems and Filter Banks*, Prentice Hall,
//! 1993, Chapter 4.
//!
//! # Example
//!
//! ```rust
//! use hgm_analysis::resample::{decimate, interpolate};
//!
//! let signal: Vec<f64> = (0..4800)
//!     .map(|i| (2.0 * std::f64::consts::PI * 1000.0 * i as f64 / 48000.0).sin())
//!     .collect();
//!
//! let up = interpolate(&signal, 3, 0);
//! assert_eq!(up.len(), signal.len() * 3);
//! let down = decimate(&up, 3, 0);
//! assert_eq!(down.len(), signal.len());
//! ```

use std::f64::consts::PI;

use crate::fft::convolve;

/// Compute windowed-sinc lowpass FIR coefficients.
///
/// * `num_taps` - Filter length; odd counts give a symmetric Type I filter.
/// * `cutoff` - Normalized cutoff in (0.0, 1.0), where 1.0 is Nyquist.
///
/// Returns coefficients normalized to sum = 1.0.
pub fn design_lowpass(num_taps: usize, cutoff: f64) -> Vec<f64> {
    if num_taps == 0 {
        return Vec::new();
    }

    let m = num_taps - 1;
    let mut coeffs: Vec<f64> = (0..num_taps)
        .map(|n| {
            let x = n as f64 - m as f64 / 2.0;
            let sinc = if x.abs() < 1e-12 {
                cutoff
            } else {
                (PI * cutoff * x).sin() / (PI * x)
            };
            let window = if m == 0 {
                1.0
            } else {
                let phase = 2.0 * PI * n as f64 / m as f64;
                0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos()
            };
            sinc * window
        })
        .collect();

    let sum: f64 = coeffs.iter().sum();
    if sum.abs() > 1e-12 {
        for c in coeffs.iter_mut() {
            *c /= sum;
        }
    }

    coeffs
}

/// Apply a linear-phase FIR, compensating its group delay so the output is
/// aligned with and as long as the input.
fn apply_fir(signal: &[f64], coeffs: &[f64]) -> Vec<f64> {
    if coeffs.is_empty() || signal.is_empty() {
        return signal.to_vec();
    }
    let half_delay = (coeffs.len() - 1) / 2;
    let full = convolve(signal, coeffs);
    full[half_delay..half_delay + signal.len()].to_vec()
}

fn default_taps(factor: usize, filter_order: usize) -> usize {
    if filter_order == 0 {
        4 * factor * 10 + 1
    } else {
        filter_order
    }
}

/// Decimate a signal by an integer factor.
///
/// Lowpass at `0.9 / factor` (10% guard band), then keep every
/// `factor`-th sample. `filter_order == 0` selects `40 * factor + 1` taps.
/// Output length is `ceil(len / factor)`.
pub fn decimate(signal: &[f64], factor: usize, filter_order: usize) -> Vec<f64> {
    assert!(factor >= 1, "decimation factor must be >= 1");

    if factor == 1 {
        return signal.to_vec();
    }

    let coeffs = design_lowpass(default_taps(factor, filter_order), 0.9 / factor as f64);
    apply_fir(signal, &coeffs).into_iter().step_by(factor).collect()
}

/// Interpolate a signal by an integer factor.
///
/// Zero-stuffs `factor - 1` samples between inputs, lowpasses at
/// `0.9 / factor` and rescales by `factor` for unity passband gain.
/// Output length is `len * factor`.
pub fn interpolate(signal: &[f64], factor: usize, filter_order: usize) -> Vec<f64> {
    assert!(factor >= 1, "interpolation factor must be >= 1");

    if factor == 1 {
        return signal.to_vec();
    }

    let coeffs = design_lowpass(default_taps(factor, filter_order), 0.9 / factor as f64);

    let mut upsampled = vec![0.0; signal.len() * factor];
    for (i, &s) in signal.iter().enumerate() {
        upsampled[i * factor] = s;
    }

    apply_fir(&upsampled, &coeffs)
        .into_iter()
        .map(|x| x * factor as f64)
        .collect()
}
