//! Integration tests for hgm-io WAV and model file I/O.

use hgm_analysis::{AliasingCompensation, IdentificationSettings, SweepIdentification};
use hgm_core::Signal;
use hgm_io::{
    Error, WavFormat, load_model, read_signal, read_wav_info, save_model, write_signal,
};
use tempfile::{NamedTempFile, tempdir};

// ---------------------------------------------------------------------------
// WAV roundtrip tests
// ---------------------------------------------------------------------------

fn sine_wave(sample_rate: f64, freq_hz: f64, num_samples: usize) -> Vec<f64> {
    (0..num_samples)
        .map(|i| (2.0 * std::f64::consts::PI * freq_hz * i as f64 / sample_rate).sin())
        .collect()
}

#[test]
fn wav_roundtrip_excitation_f32() {
    let identification = SweepIdentification::sine(
        IdentificationSettings::new(vec![1, 2]).with_excitation_length(32768),
    )
    .unwrap();
    let context = identification.excitation().unwrap();

    let file = NamedTempFile::new().unwrap();
    write_signal(file.path(), context.excitation(), 32).unwrap();
    let loaded = read_signal(file.path()).unwrap();

    assert_eq!(loaded.len(), context.excitation().len());
    assert_eq!(loaded.sampling_rate(), context.excitation().sampling_rate());
    for (a, b) in context.excitation().channel(0).unwrap().iter().zip(loaded.channel(0).unwrap()) {
        assert!((a - b).abs() < 1e-6, "sample mismatch: {a} vs {b}");
    }
}

#[test]
fn wav_roundtrip_stereo_i24() {
    let sr = 96000.0;
    let left: Vec<f64> = sine_wave(sr, 1000.0, 4800).iter().map(|x| x * 0.8).collect();
    let right: Vec<f64> = sine_wave(sr, 250.0, 4800).iter().map(|x| x * -0.5).collect();
    let signal = Signal::new(vec![left.clone(), right.clone()], sr).unwrap();

    let file = NamedTempFile::new().unwrap();
    write_signal(file.path(), &signal, 24).unwrap();
    let loaded = read_signal(file.path()).unwrap();

    assert_eq!(loaded.num_channels(), 2);
    for (a, b) in left.iter().zip(loaded.channel(0).unwrap()) {
        assert!((a - b).abs() < 1e-6);
    }
    for (a, b) in right.iter().zip(loaded.channel(1).unwrap()) {
        assert!((a - b).abs() < 1e-6);
    }
}

#[test]
fn wav_write_empty_buffer() {
    let signal = Signal::mono(Vec::new(), 48000.0).unwrap();
    let file = NamedTempFile::new().unwrap();
    write_signal(file.path(), &signal, 32).unwrap();

    let loaded = read_signal(file.path()).unwrap();
    assert!(loaded.is_empty());
    assert_eq!(loaded.num_channels(), 1);
}

#[test]
fn wav_info_reports_layout() {
    let signal = Signal::zeros(2, 44100, 44100.0).unwrap();
    let file = NamedTempFile::new().unwrap();
    write_signal(file.path(), &signal, 16).unwrap();

    let info = read_wav_info(file.path()).unwrap();
    assert_eq!(info.channels, 2);
    assert_eq!(info.sample_rate, 44100);
    assert_eq!(info.bits_per_sample, 16);
    assert_eq!(info.num_frames, 44100);
    assert_eq!(info.format, WavFormat::Pcm);
    assert!((info.duration_secs - 1.0).abs() < 1e-9);
}

#[test]
fn read_missing_file_fails() {
    assert!(matches!(
        read_signal("/nonexistent/response.wav"),
        Err(Error::Wav(_))
    ));
}

// ---------------------------------------------------------------------------
// Model files
// ---------------------------------------------------------------------------

#[test]
fn identified_model_survives_save_and_load() {
    let identification = SweepIdentification::cosine(
        IdentificationSettings::new(vec![1, 2])
            .with_excitation_length(16384)
            .with_filter_length(256),
    )
    .unwrap();
    let context = identification.excitation().unwrap();
    let x = context.excitation().channel(0).unwrap();
    let response = Signal::mono(
        x.iter().map(|v| 0.8 * v + 0.1 * v * v).collect(),
        context.excitation().sampling_rate(),
    )
    .unwrap();
    let model = identification
        .identify(&context, &response)
        .unwrap()
        .into_model(AliasingCompensation::None)
        .unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("device.json");
    save_model(&path, &model).unwrap();
    let loaded = load_model(&path).unwrap();

    assert_eq!(loaded, model);
    let probe = Signal::mono(sine_wave(48000.0, 440.0, 1024), 48000.0).unwrap();
    assert_eq!(loaded.process(&probe).unwrap(), model.process(&probe).unwrap());
}

#[test]
fn load_rejects_malformed_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ \"version\": 1, \"family\": \"power\" ").unwrap();
    assert!(matches!(load_model(&path), Err(Error::Json(_))));
}

#[test]
fn load_rejects_unknown_family() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("family.json");
    std::fs::write(
        &path,
        r#"{"version":1,"family":"legendre","degrees":[1],"sampling_rate":48000.0,
            "kernels":[{"label":"Branch 1","channels":[[1.0]]}]}"#,
    )
    .unwrap();
    assert!(matches!(load_model(&path), Err(Error::Json(_))));
}

#[test]
fn load_accepts_missing_aliasing_field() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("minimal.json");
    std::fs::write(
        &path,
        r#"{"version":1,"family":"power","degrees":[1,2],"sampling_rate":48000.0,
            "kernels":[{"channels":[[1.0,0.0]]},{"channels":[[0.5,0.0]]}]}"#,
    )
    .unwrap();
    let model = load_model(&path).unwrap();
    assert_eq!(model.aliasing(), AliasingCompensation::None);
    assert_eq!(model.branches(), 2);
}
