//! FFT wrapper and real-signal spectral transforms

use hgm_core::{Signal, Spectrum};
use rustfft::{FftPlanner, num_complex::Complex};
use std::f64::consts::PI;
use std::sync::Arc;

/// FFT processor with caching
pub struct Fft {
    fft: Arc<dyn rustfft::Fft<f64>>,
    ifft: Arc<dyn rustfft::Fft<f64>>,
    size: usize,
}

impl Fft {
    /// Create a new FFT processor for the given size
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        let ifft = planner.plan_fft_inverse(size);

        Self {
            fft,
            ifft,
            size,
        }
    }

    /// Get FFT size
    pub fn size(&self) -> usize {
        self.size
    }

    /// Perform forward FFT on real input
    ///
    /// Input is zero-padded or truncated to the FFT size. Returns
    /// `size/2 + 1` bins (DC to Nyquist).
    pub fn forward(&self, input: &[f64]) -> Vec<Complex<f64>> {
        let mut buffer: Vec<Complex<f64>> = input
            .iter()
            .take(self.size)
            .map(|&x| Complex::new(x, 0.0))
            .collect();
        buffer.resize(self.size, Complex::new(0.0, 0.0));

        self.fft.process(&mut buffer);

        buffer.truncate(self.size / 2 + 1);
        buffer
    }

    /// Perform inverse FFT from a half spectrum
    ///
    /// Rebuilds the negative frequencies by conjugate symmetry and returns the
    /// real part, normalized by `1/size`. Imaginary parts of the DC and
    /// Nyquist bins do not contribute.
    pub fn inverse(&self, spectrum: &[Complex<f64>]) -> Vec<f64> {
        let n = self.size;
        let mut buffer = vec![Complex::new(0.0, 0.0); n];
        let half = (n / 2 + 1).min(spectrum.len());
        buffer[..half].copy_from_slice(&spectrum[..half]);

        // Mirror for negative frequencies (conjugate symmetry)
        for k in (n / 2 + 1)..n {
            if let Some(bin) = spectrum.get(n - k) {
                buffer[k] = bin.conj();
            }
        }

        self.ifft.process(&mut buffer);

        let scale = 1.0 / n as f64;
        buffer.iter().map(|c| c.re * scale).collect()
    }
}

/// Transform every channel of a signal to its half spectrum.
///
/// Resolution is `sampling_rate / len`; the spectrum remembers `len` so
/// [`inverse`] can restore the exact sample count.
pub fn forward(signal: &Signal) -> hgm_core::Result<Spectrum> {
    let len = signal.len();
    let fft = Fft::new(len);
    let channels = signal.channels().iter().map(|ch| fft.forward(ch)).collect();
    let resolution = signal.sampling_rate() / len as f64;
    Spectrum::new(channels, resolution, len)?.with_labels(signal.labels().to_vec())
}

/// Transform every channel of a half spectrum back to the time domain.
pub fn inverse(spectrum: &Spectrum) -> hgm_core::Result<Signal> {
    let fft = Fft::new(spectrum.signal_length());
    let channels = spectrum
        .channels()
        .iter()
        .map(|ch| fft.inverse(ch))
        .collect();
    Signal::new(channels, spectrum.sampling_rate())?.with_labels(spectrum.labels().to_vec())
}

/// Full linear convolution of two sequences via FFT.
///
/// Output length is `a.len() + b.len() - 1` (empty if either input is).
pub fn convolve(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let out_len = a.len() + b.len() - 1;
    let fft = Fft::new(out_len.next_power_of_two());

    let spec_a = fft.forward(a);
    let spec_b = fft.forward(b);
    let product: Vec<Complex<f64>> = spec_a.iter().zip(&spec_b).map(|(x, y)| x * y).collect();

    let mut out = fft.inverse(&product);
    out.truncate(out_len);
    out
}

/// Circularly advance every channel by a possibly fractional number of samples.
///
/// Sample `n` of the output is sample `n + shift` of the input (mod length).
/// The integer and fractional parts are applied together as a linear phase
/// ramp on the half spectrum.
pub fn advance(signal: &Signal, shift: f64) -> hgm_core::Result<Signal> {
    let spectrum = forward(signal)?;
    let len = signal.len() as f64;
    let ramp: Vec<Complex<f64>> = (0..spectrum.len())
        .map(|k| Complex::from_polar(1.0, 2.0 * PI * k as f64 * shift / len))
        .collect();
    let shifted = Spectrum::new(
        spectrum
            .channels()
            .iter()
            .map(|ch| ch.iter().zip(&ramp).map(|(b, r)| b * r).collect())
            .collect(),
        spectrum.resolution(),
        spectrum.signal_length(),
    )?
    .with_labels(spectrum.labels().to_vec())?;
    inverse(&shifted)
}

/// Compute magnitude spectrum in dB
pub fn magnitude_db(spectrum: &[Complex<f64>]) -> Vec<f64> {
    spectrum
        .iter()
        .map(|c| hgm_core::linear_to_db(c.norm()))
        .collect()
}
