//! Comparison tools for identified kernels and simulated outputs

use crate::fft::Fft;

/// Compute Mean Squared Error between two signals
pub fn mse(signal_a: &[f64], signal_b: &[f64]) -> f64 {
    let len = signal_a.len().min(signal_b.len());
    if len == 0 {
        return 0.0;
    }

    let sum: f64 = signal_a[..len]
        .iter()
        .zip(signal_b[..len].iter())
        .map(|(a, b)| (a - b).powi(2))
        .sum();

    sum / len as f64
}

/// Compute Root Mean Squared Error
pub fn rmse(signal_a: &[f64], signal_b: &[f64]) -> f64 {
    mse(signal_a, signal_b).sqrt()
}

/// Compute Signal-to-Noise Ratio in dB
///
/// Treats `test` as a noisy version of `reference`.
pub fn snr_db(reference: &[f64], test: &[f64]) -> f64 {
    let len = reference.len().min(test.len());
    if len == 0 {
        return 0.0;
    }

    let signal_power: f64 = reference[..len].iter().map(|x| x.powi(2)).sum();
    let noise_power: f64 = reference[..len]
        .iter()
        .zip(test[..len].iter())
        .map(|(r, t)| (r - t).powi(2))
        .sum();

    if noise_power > 1e-20 {
        10.0 * (signal_power / noise_power).log10()
    } else {
        f64::INFINITY
    }
}

fn band_magnitudes(signal: &[f64], fft_size: usize, sampling_rate: f64, band: (f64, f64)) -> Vec<f64> {
    let fft = Fft::new(fft_size);
    let resolution = sampling_rate / fft_size as f64;
    fft.forward(signal)
        .iter()
        .enumerate()
        .filter(|(i, _)| {
            let f = *i as f64 * resolution;
            f >= band.0 && f <= band.1
        })
        .map(|(_, c)| c.norm())
        .collect()
}

/// Mean magnitude response of an impulse response inside `band` (Hz).
///
/// Returns 0 when no bin falls inside the band.
pub fn mean_band_magnitude(impulse_response: &[f64], sampling_rate: f64, band: (f64, f64)) -> f64 {
    let mags = band_magnitudes(impulse_response, impulse_response.len().max(1), sampling_rate, band);
    if mags.is_empty() {
        return 0.0;
    }
    mags.iter().sum::<f64>() / mags.len() as f64
}

/// Relative magnitude error of `kernel` against `reference` inside `band` (Hz).
///
/// Both impulse responses are zero-padded to a common length. Returns
/// `Σ | |K| - |R| | / Σ |R|` over the in-band bins, so 0.1 means the
/// magnitude responses differ by 10% on average.
pub fn band_magnitude_error(
    kernel: &[f64],
    reference: &[f64],
    sampling_rate: f64,
    band: (f64, f64),
) -> f64 {
    let size = kernel.len().max(reference.len()).max(1);
    let k = band_magnitudes(kernel, size, sampling_rate, band);
    let r = band_magnitudes(reference, size, sampling_rate, band);
    let total: f64 = r.iter().sum();
    if total <= 0.0 {
        return if k.iter().sum::<f64>() > 0.0 { f64::INFINITY } else { 0.0 };
    }
    k.iter().zip(&r).map(|(a, b)| (a - b).abs()).sum::<f64>() / total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mse_identical() {
        let signal = vec![1.0, 2.0, 3.0, 4.0];
        assert_eq!(mse(&signal, &signal), 0.0);
    }

    #[test]
    fn test_mse_difference() {
        let a = vec![1.0, 2.0, 3.0, 4.0];
        let b = vec![2.0, 3.0, 4.0, 5.0];
        assert_eq!(mse(&a, &b), 1.0);
        assert_eq!(rmse(&a, &b), 1.0);
    }

    #[test]
    fn test_snr_db() {
        let reference = vec![1.0; 100];
        assert!(snr_db(&reference, &reference).is_infinite());
        let noisy: Vec<f64> = reference.iter().map(|x| x * 1.1).collect();
        // noise is a tenth of the signal → 20 dB
        assert!((snr_db(&reference, &noisy) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_band_magnitude_of_scaled_impulse() {
        let mut ir = vec![0.0; 1024];
        ir[0] = 0.5;
        assert!((mean_band_magnitude(&ir, 48000.0, (100.0, 10000.0)) - 0.5).abs() < 1e-12);

        let mut reference = vec![0.0; 256];
        reference[0] = 0.4;
        let err = band_magnitude_error(&ir, &reference, 48000.0, (100.0, 10000.0));
        assert!((err - 0.25).abs() < 1e-9, "err {}", err);
    }

    #[test]
    fn test_band_magnitude_ignores_delay() {
        let mut a = vec![0.0; 512];
        let mut b = vec![0.0; 512];
        a[0] = 1.0;
        b[17] = 1.0;
        assert!(band_magnitude_error(&a, &b, 48000.0, (20.0, 20000.0)) < 1e-9);
    }
}
