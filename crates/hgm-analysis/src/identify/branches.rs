//! Per-order harmonic extraction from the deconvolved impulse response

use hgm_core::Signal;
use rayon::prelude::*;

use crate::error::Result;
use crate::harmonic::HarmonicWindower;
use crate::sweep::ExcitationGenerator;

/// Split a deconvolved sweep response into `branches` harmonic impulse
/// responses and stack them into one signal.
///
/// A single branch is the first quarter of the excitation length. With more
/// branches every order, order 1 included, comes from `windower` and is
/// cropped or zero-padded to the excitation length, so the pre-onset part of
/// the linear response is kept the same way as for the higher harmonics. The result holds `branches` contiguous channel groups, order 1
/// first, each with one channel per channel of `impulse_response`.
pub fn extract(
    impulse_response: &Signal,
    branches: usize,
    generator: &dyn ExcitationGenerator,
    windower: &dyn HarmonicWindower,
) -> Result<Signal> {
    let excitation_length = generator.length();

    let segments: Vec<Signal> = (1..=branches)
        .into_par_iter()
        .map(|order| {
            if branches == 1 {
                Ok(impulse_response.crop(0, excitation_length / 4))
            } else {
                windower
                    .extract_harmonic(impulse_response, order, generator)
                    .map(|h| h.resize(excitation_length))
            }
        })
        .collect::<Result<_>>()?;

    tracing::debug!(branches, excitation_length, "extracted harmonic impulse responses");

    Ok(Signal::merge_fill_zeros(&segments)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IdentificationError;
    use crate::harmonic::NovakHarmonicWindower;
    use crate::sweep::SynchronizedSweep;

    #[test]
    fn stacks_groups_in_order() {
        let sweep = SynchronizedSweep::sine(48000.0, 16384, 20.0, 24000.0).unwrap();
        let len = sweep.length();
        let ir = Signal::new(vec![vec![0.0; len]; 2], 48000.0).unwrap();

        let merged = extract(&ir, 3, &sweep, &NovakHarmonicWindower).unwrap();
        assert_eq!(merged.num_channels(), 6);
        assert_eq!(merged.len(), len);
        assert_eq!(merged.labels()[4], "Harmonic 3");
    }

    #[test]
    fn single_branch_is_cropped_direct_response() {
        let sweep = SynchronizedSweep::sine(48000.0, 16384, 20.0, 24000.0).unwrap();
        let len = sweep.length();
        let ir: Vec<f64> = (0..len).map(|i| (i as f64 * 0.01).sin()).collect();
        let ir = Signal::mono(ir, 48000.0).unwrap();

        let merged = extract(&ir, 1, &sweep, &NovakHarmonicWindower).unwrap();
        assert_eq!(merged.len(), len / 4);
        assert_eq!(merged.channel(0).unwrap(), &ir.channel(0).unwrap()[..len / 4]);
    }

    #[test]
    fn linear_group_keeps_wrapped_tail_with_several_branches() {
        let sweep = SynchronizedSweep::sine(48000.0, 16384, 20.0, 20000.0).unwrap();
        let len = sweep.length();
        let mut ir = vec![0.0; len];
        ir[0] = 1.0;
        ir[len - 2] = -0.4;
        let ir = Signal::mono(ir, 48000.0).unwrap();

        let merged = extract(&ir, 2, &sweep, &NovakHarmonicWindower).unwrap();
        let linear = merged.channel(0).unwrap();
        assert!((linear[0] - 1.0).abs() < 1e-9);
        assert!((linear[len - 2] + 0.4).abs() < 1e-9);

        let single = extract(&ir, 1, &sweep, &NovakHarmonicWindower).unwrap();
        assert_eq!(single.len(), len / 4);
    }

    #[test]
    fn propagates_windower_errors() {
        let sweep = SynchronizedSweep::sine(48000.0, 4096, 100.0, 24000.0).unwrap();
        let ir = Signal::zeros(1, sweep.length(), 48000.0).unwrap();
        assert!(matches!(
            extract(&ir, 1000, &sweep, &NovakHarmonicWindower),
            Err(IdentificationError::HarmonicBeyondExcitation { .. })
        ));
    }
}
