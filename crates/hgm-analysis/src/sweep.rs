//! Synchronized exponential sweeps for harmonic identification
//!
//! The sweep rate `L` is rounded so that `f1 · L` is an integer. With that
//! constraint the `k`-th harmonic of the sweep is the sweep itself advanced by
//! `L · ln(k)` seconds, so after deconvolution every harmonic lands at a known
//! position before time zero.

use std::f64::consts::PI;

use hgm_core::{Complex, Signal};

use crate::error::{IdentificationError, Result};
use crate::fft::Fft;

/// Which trigonometric function drives the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SweepKind {
    /// `sin(2π f1 L e^{t/L})`, used with power-series branches
    Sine,
    /// `cos(2π f1 L e^{t/L})`, used with Chebyshev branches
    Cosine,
}

impl core::fmt::Display for SweepKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SweepKind::Sine => f.write_str("sine"),
            SweepKind::Cosine => f.write_str("cosine"),
        }
    }
}

/// Source of an identification excitation and its deconvolution filter.
///
/// Implementations must be deterministic: repeated calls return identical
/// signals.
pub trait ExcitationGenerator: Send + Sync {
    /// The excitation signal.
    fn output(&self) -> Signal;

    /// The inverse filter, same length and rate as [`output`](Self::output).
    fn reversed_output(&self) -> Signal;

    /// Excitation length in samples.
    fn length(&self) -> usize;

    /// Sampling rate in Hz.
    fn sampling_rate(&self) -> f64;

    /// Sweep rate `L` in seconds.
    fn sweep_rate(&self) -> f64;

    /// Trigonometric variant of the excitation.
    fn kind(&self) -> SweepKind;

    /// Position of harmonic `order` before time zero, in (fractional) samples.
    fn harmonic_delay(&self, order: usize) -> f64 {
        self.sweep_rate() * (order as f64).ln() * self.sampling_rate()
    }
}

/// Synchronized swept sine (or cosine) after Novák et al.
///
/// # Example
///
/// ```rust
/// use hgm_analysis::sweep::{ExcitationGenerator, SynchronizedSweep};
///
/// let sweep = SynchronizedSweep::sine(48000.0, 2usize.pow(15), 20.0, 20000.0).unwrap();
/// assert_eq!(sweep.output().len(), sweep.length());
/// // f1 · L is an integer
/// let cycles = 20.0 * sweep.sweep_rate();
/// assert!((cycles - cycles.round()).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SynchronizedSweep {
    kind: SweepKind,
    sampling_rate: f64,
    start_freq: f64,
    stop_freq: f64,
    sweep_rate: f64,
    length: usize,
    output: Signal,
    reversed: Signal,
}

impl SynchronizedSweep {
    /// Create a sweep of roughly `approximate_length` samples.
    ///
    /// The actual length is adjusted so the sweep rate satisfies the
    /// synchronization constraint.
    pub fn new(
        kind: SweepKind,
        sampling_rate: f64,
        approximate_length: usize,
        start_freq: f64,
        stop_freq: f64,
    ) -> Result<Self> {
        if !(sampling_rate.is_finite() && sampling_rate > 0.0) {
            return Err(IdentificationError::InvalidExcitation(format!(
                "sampling rate must be positive, got {sampling_rate}"
            )));
        }
        if approximate_length == 0 {
            return Err(IdentificationError::InvalidExcitation(
                "excitation length must be positive".into(),
            ));
        }
        if !(start_freq > 0.0 && start_freq < stop_freq && stop_freq <= sampling_rate / 2.0) {
            return Err(IdentificationError::InvalidExcitation(format!(
                "frequencies must satisfy 0 < start ({start_freq}) < stop ({stop_freq}) <= {}",
                sampling_rate / 2.0
            )));
        }

        let span = (stop_freq / start_freq).ln();
        let duration = approximate_length as f64 / sampling_rate;
        let cycles = (start_freq * duration / span).round();
        if cycles < 1.0 {
            return Err(IdentificationError::InvalidExcitation(format!(
                "{approximate_length} samples are too short to sweep from {start_freq} Hz to {stop_freq} Hz"
            )));
        }
        let sweep_rate = cycles / start_freq;
        let length = (sweep_rate * span * sampling_rate).round() as usize;

        let mut sweep = Self {
            kind,
            sampling_rate,
            start_freq,
            stop_freq,
            sweep_rate,
            length,
            output: Signal::zeros(1, 0, sampling_rate)?,
            reversed: Signal::zeros(1, 0, sampling_rate)?,
        };
        sweep.output = Signal::mono(sweep.generate(), sampling_rate)?
            .with_labels(vec![format!("{kind} sweep")])?;
        sweep.reversed = Signal::mono(sweep.inverse_filter(), sampling_rate)?
            .with_labels(vec![format!("inverse {kind} sweep")])?;
        Ok(sweep)
    }

    /// Sine variant.
    pub fn sine(
        sampling_rate: f64,
        approximate_length: usize,
        start_freq: f64,
        stop_freq: f64,
    ) -> Result<Self> {
        Self::new(SweepKind::Sine, sampling_rate, approximate_length, start_freq, stop_freq)
    }

    /// Cosine variant.
    pub fn cosine(
        sampling_rate: f64,
        approximate_length: usize,
        start_freq: f64,
        stop_freq: f64,
    ) -> Result<Self> {
        Self::new(SweepKind::Cosine, sampling_rate, approximate_length, start_freq, stop_freq)
    }

    /// Start frequency in Hz.
    pub fn start_freq(&self) -> f64 {
        self.start_freq
    }

    /// Stop frequency in Hz.
    pub fn stop_freq(&self) -> f64 {
        self.stop_freq
    }

    /// Sweep duration in seconds.
    pub fn duration(&self) -> f64 {
        self.length as f64 / self.sampling_rate
    }

    /// Generate the raw sweep samples.
    pub fn generate(&self) -> Vec<f64> {
        let phase_scale = 2.0 * PI * self.start_freq * self.sweep_rate;
        (0..self.length)
            .map(|n| {
                let t = n as f64 / self.sampling_rate;
                let phase = phase_scale * (t / self.sweep_rate).exp();
                match self.kind {
                    SweepKind::Sine => phase.sin(),
                    SweepKind::Cosine => phase.cos(),
                }
            })
            .collect()
    }

    /// Analytic inverse filter on the DC..Nyquist bins of a `length`-point DFT.
    ///
    /// `X̃(f) = 2·sqrt(f/L)·exp(-j2πfL(1 - ln(f/f1)) ± jπ/4)`, with `+` for the
    /// sine and `-` for the cosine sweep. The DC bin is zero.
    pub fn inverse_filter_spectrum(&self) -> Vec<Complex<f64>> {
        let bins = self.length / 2 + 1;
        let resolution = self.sampling_rate / self.length as f64;
        let quarter_turn = match self.kind {
            SweepKind::Sine => PI / 4.0,
            SweepKind::Cosine => -PI / 4.0,
        };
        let l = self.sweep_rate;

        (0..bins)
            .map(|b| {
                if b == 0 {
                    return Complex::new(0.0, 0.0);
                }
                let f = b as f64 * resolution;
                let magnitude = 2.0 * (f / l).sqrt();
                let phase =
                    -2.0 * PI * f * l * (1.0 - (f / self.start_freq).ln()) + quarter_turn;
                Complex::from_polar(magnitude, phase)
            })
            .collect()
    }

    /// Inverse filter in the time domain.
    pub fn inverse_filter(&self) -> Vec<f64> {
        Fft::new(self.length).inverse(&self.inverse_filter_spectrum())
    }
}

impl ExcitationGenerator for SynchronizedSweep {
    fn output(&self) -> Signal {
        self.output.clone()
    }

    fn reversed_output(&self) -> Signal {
        self.reversed.clone()
    }

    fn length(&self) -> usize {
        self.length
    }

    fn sampling_rate(&self) -> f64 {
        self.sampling_rate
    }

    fn sweep_rate(&self) -> f64 {
        self.sweep_rate
    }

    fn kind(&self) -> SweepKind {
        self.kind
    }
}
