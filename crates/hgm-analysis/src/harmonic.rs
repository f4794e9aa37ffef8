//! Separation of harmonic impulse responses from a sweep deconvolution
//!
//! After deconvolving a synchronized sweep response, the impulse response of
//! harmonic `k` sits `L·ln(k)·fs` samples before time zero, wrapped to the end
//! of the circular result.

use hgm_core::Signal;

use crate::error::{IdentificationError, Result};
use crate::fft;
use crate::sweep::ExcitationGenerator;

/// Cuts the impulse response of one harmonic out of a deconvolved sweep
/// response.
pub trait HarmonicWindower: Sync {
    /// Return the impulse response of harmonic `order` (≥ 1), moved so that
    /// the harmonic onset lies at sample 0.
    fn extract_harmonic(
        &self,
        impulse_response: &Signal,
        order: usize,
        generator: &dyn ExcitationGenerator,
    ) -> Result<Signal>;
}

/// Harmonic windower for synchronized sweeps.
///
/// The region of harmonic `k` reaches halfway to its neighbours `k - 1` and
/// `k + 1`. The returned signal has the full excitation length and is
/// circular: the part after the onset starts at sample 0, the part before
/// the onset is wrapped to the end. Keeping both sides matters for even
/// harmonics of a sine sweep, whose responses are quadrature (two-sided)
/// rather than causal, and for any sweep stopping below Nyquist, whose
/// band-limited responses ring before the onset.
///
/// Order 1 keeps the first quarter of the buffer after its onset and half
/// the distance to harmonic 2 before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NovakHarmonicWindower;

impl NovakHarmonicWindower {
    /// Number of samples kept before and after the onset of harmonic `order`.
    pub fn window_bounds(order: usize, generator: &dyn ExcitationGenerator) -> (usize, usize) {
        let delay = generator.harmonic_delay(order);
        let previous = generator.harmonic_delay(order - 1);
        let next = generator.harmonic_delay(order + 1);
        let length = generator.length();
        let after = ((delay - previous) / 2.0).ceil() as usize;
        let before = ((next - delay) / 2.0).floor() as usize;
        // the region cannot be wider than the excitation itself
        let after = after.min(length);
        let before = before.min(length - after);
        (before, after)
    }
}

/// Highest harmonic order whose onset lies inside `length` samples.
pub fn separable_orders(generator: &dyn ExcitationGenerator, length: usize) -> usize {
    (1..)
        .take_while(|&k| generator.harmonic_delay(k) < length as f64)
        .last()
        .unwrap_or(0)
}

impl HarmonicWindower for NovakHarmonicWindower {
    fn extract_harmonic(
        &self,
        impulse_response: &Signal,
        order: usize,
        generator: &dyn ExcitationGenerator,
    ) -> Result<Signal> {
        let length = impulse_response.len();
        if order == 0 {
            return Err(IdentificationError::BranchOutOfRange {
                branch: 0,
                available: separable_orders(generator, length),
            });
        }
        let delay = generator.harmonic_delay(order);
        if delay >= length as f64 {
            return Err(IdentificationError::HarmonicBeyondExcitation {
                order,
                delay,
                length,
            });
        }

        let (before, after) = if order == 1 {
            let after = length / 4;
            let before = (generator.harmonic_delay(2) / 2.0).floor() as usize;
            (before.min(length - after), after)
        } else {
            Self::window_bounds(order, generator)
        };

        tracing::debug!(order, delay, before, after, "windowing harmonic");

        let aligned = fft::advance(impulse_response, -delay)?;
        let channels = aligned
            .channels()
            .iter()
            .map(|ch| {
                ch.iter()
                    .enumerate()
                    .map(|(n, &x)| if n < after || n >= length - before { x } else { 0.0 })
                    .collect()
            })
            .collect();
        let label = format!("Harmonic {order}");
        Ok(Signal::new(channels, impulse_response.sampling_rate())?
            .with_labels(vec![label; impulse_response.num_channels()])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep::SynchronizedSweep;

    fn sweep() -> SynchronizedSweep {
        SynchronizedSweep::sine(48000.0, 32768, 20.0, 24000.0).unwrap()
    }

    #[test]
    fn impulse_at_harmonic_position_moves_to_zero() {
        let sweep = sweep();
        let len = sweep.length();
        let delay = sweep.harmonic_delay(3);
        // place a band-limited pulse exactly at the harmonic position
        let position = len as f64 - delay;
        let mut ir = vec![0.0; len];
        for (n, x) in ir.iter_mut().enumerate() {
            let d = n as f64 - position;
            *x = (-(d / 4.0).powi(2)).exp();
        }
        let ir = Signal::mono(ir, 48000.0).unwrap();

        let harmonic = NovakHarmonicWindower.extract_harmonic(&ir, 3, &sweep).unwrap();
        assert_eq!(harmonic.len(), len);
        assert_eq!(harmonic.labels(), &["Harmonic 3".to_string()]);
        let out = harmonic.channel(0).unwrap();
        assert!((out[0] - 1.0).abs() < 1e-6);
        assert!((out[4] - (-1.0f64).exp()).abs() < 1e-6);
        // pre-onset half of the pulse wraps to the end
        assert!((out[len - 4] - (-1.0f64).exp()).abs() < 1e-6);
    }

    #[test]
    fn neighbouring_harmonics_are_excluded() {
        let sweep = sweep();
        let len = sweep.length();
        let mut ir = vec![0.0; len];
        for k in 2..=4 {
            let position = (len as f64 - sweep.harmonic_delay(k)).round() as usize;
            ir[position] = k as f64;
        }
        let ir = Signal::mono(ir, 48000.0).unwrap();
        let harmonic = NovakHarmonicWindower.extract_harmonic(&ir, 3, &sweep).unwrap();
        let out = harmonic.channel(0).unwrap();
        let peak = out.iter().fold(0.0f64, |m, &x| m.max(x.abs()));
        // integer placement smears slightly, but the neighbours at ±thousands of
        // samples must be gone
        let energy_far: f64 = out[200..len - 200].iter().map(|x| x * x).sum();
        assert!(peak > 1.5, "peak {peak}");
        assert!(energy_far < 0.05, "energy {energy_far}");
    }

    #[test]
    fn rejects_harmonic_beyond_excitation() {
        let sweep = SynchronizedSweep::sine(48000.0, 4096, 100.0, 24000.0).unwrap();
        let ir = Signal::zeros(1, sweep.length(), 48000.0).unwrap();
        let order = separable_orders(&sweep, sweep.length()) + 1;
        assert!(matches!(
            NovakHarmonicWindower.extract_harmonic(&ir, order, &sweep),
            Err(IdentificationError::HarmonicBeyondExcitation { .. })
        ));
    }

    #[test]
    fn linear_harmonic_keeps_pre_onset_tail() {
        let sweep = sweep();
        let len = sweep.length();
        let mut ir = vec![0.0; len];
        ir[0] = 1.0;
        ir[len - 3] = 0.5;
        ir[len / 4 + 10] = 0.25;
        let ir = Signal::mono(ir, 48000.0).unwrap();

        let harmonic = NovakHarmonicWindower.extract_harmonic(&ir, 1, &sweep).unwrap();
        let out = harmonic.channel(0).unwrap();
        assert!((out[0] - 1.0).abs() < 1e-9);
        assert!((out[len - 3] - 0.5).abs() < 1e-9);
        assert!(out[len / 4 + 10].abs() < 1e-9);
    }

    #[test]
    fn window_bounds_split_gaps_in_half() {
        let sweep = sweep();
        let (before, after) = NovakHarmonicWindower::window_bounds(2, &sweep);
        let d1 = sweep.harmonic_delay(1);
        let d2 = sweep.harmonic_delay(2);
        let d3 = sweep.harmonic_delay(3);
        assert_eq!(after, ((d2 - d1) / 2.0).ceil() as usize);
        assert_eq!(before, ((d3 - d2) / 2.0).floor() as usize);
    }
}
