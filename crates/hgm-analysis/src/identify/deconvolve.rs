//! Inverse-filter deconvolution of a sweep response

use hgm_core::{Complex, Signal};

use crate::error::{IdentificationError, Result};
use crate::fft;

/// Deconvolve `response` with the inverse filter of `excitation`.
///
/// The response spectrum is divided by the sampling rate and multiplied by
/// the spectrum of `reversed_excitation`. The result is circular: the linear
/// impulse response starts at sample 0 and harmonic `k` is wrapped to the end
/// of the buffer, `L·ln(k)·fs` samples before it. A multichannel response
/// yields one impulse response per channel.
pub fn estimate(
    excitation: &Signal,
    reversed_excitation: &Signal,
    response: &Signal,
) -> Result<Signal> {
    if response.sampling_rate() != excitation.sampling_rate() {
        return Err(IdentificationError::InputMismatch(format!(
            "response sampled at {} Hz, excitation at {} Hz",
            response.sampling_rate(),
            excitation.sampling_rate()
        )));
    }
    if response.len() != excitation.len() {
        return Err(IdentificationError::InputMismatch(format!(
            "response has {} samples, excitation has {}",
            response.len(),
            excitation.len()
        )));
    }
    if reversed_excitation.len() != excitation.len()
        || reversed_excitation.sampling_rate() != excitation.sampling_rate()
    {
        return Err(IdentificationError::InputMismatch(
            "inverse filter does not match the excitation".into(),
        ));
    }

    let inverse_spectrum = fft::forward(reversed_excitation)?;
    let response_spectrum =
        fft::forward(response)?.scale(Complex::new(1.0 / response.sampling_rate(), 0.0));
    let transfer = response_spectrum.multiply(&inverse_spectrum)?;

    tracing::debug!(
        channels = response.num_channels(),
        length = response.len(),
        "deconvolved sweep response"
    );

    Ok(fft::inverse(&transfer)?.with_labels(response.labels().to_vec())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep::{ExcitationGenerator, SynchronizedSweep};

    #[test]
    fn identity_system_gives_unit_impulse() {
        let sweep = SynchronizedSweep::sine(48000.0, 32768, 20.0, 24000.0).unwrap();
        let excitation = sweep.output();
        let ir = estimate(&excitation, &sweep.reversed_output(), &excitation).unwrap();
        let ir = ir.channel(0).unwrap();
        let peak = ir
            .iter()
            .enumerate()
            .fold((0, 0.0f64), |(i, m), (j, &x)| if x.abs() > m { (j, x.abs()) } else { (i, m) });
        assert_eq!(peak.0, 0);
        assert!((ir[0] - 1.0).abs() < 0.1, "ir[0] = {}", ir[0]);
    }

    #[test]
    fn multichannel_response_gives_one_ir_per_channel() {
        let sweep = SynchronizedSweep::sine(48000.0, 16384, 20.0, 24000.0).unwrap();
        let x = sweep.output();
        let half = x.map(|v| 0.5 * v);
        let response = Signal::new(
            vec![x.channel(0).unwrap().to_vec(), half.channel(0).unwrap().to_vec()],
            48000.0,
        )
        .unwrap();
        let ir = estimate(&x, &sweep.reversed_output(), &response).unwrap();
        assert_eq!(ir.num_channels(), 2);
        let a = ir.channel(0).unwrap()[0];
        let b = ir.channel(1).unwrap()[0];
        assert!((b - 0.5 * a).abs() < 1e-9);
    }

    #[test]
    fn rejects_mismatched_inputs() {
        let sweep = SynchronizedSweep::sine(48000.0, 16384, 20.0, 24000.0).unwrap();
        let x = sweep.output();
        let rev = sweep.reversed_output();

        let short = x.crop(0, x.len() - 1);
        assert!(matches!(
            estimate(&x, &rev, &short),
            Err(IdentificationError::InputMismatch(_))
        ));

        let other_rate = Signal::mono(x.channel(0).unwrap().to_vec(), 44100.0).unwrap();
        assert!(matches!(
            estimate(&x, &rev, &other_rate),
            Err(IdentificationError::InputMismatch(_))
        ));
    }
}
