//! Display WAV file or model file metadata.

use clap::Args;
use hgm_analysis::fft::{Fft, magnitude_db};
use hgm_io::{WavFormat, load_model, read_wav_info};
use std::path::{Path, PathBuf};

/// Display WAV or model file information.
#[derive(Args)]
pub struct InfoArgs {
    /// Path to a WAV file or a model JSON file
    pub file: PathBuf,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let is_model = args
        .file
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_model {
        model_info(&args.file)?;
    } else {
        wav_info(&args.file)?;
    }

    let file_size = std::fs::metadata(&args.file)?.len();
    println!("File Size:   {}", format_bytes(file_size));

    Ok(())
}

fn wav_info(path: &Path) -> anyhow::Result<()> {
    let info = read_wav_info(path)?;

    let format_str = match info.format {
        WavFormat::Pcm => "PCM",
        WavFormat::IeeeFloat => "IEEE Float",
    };

    println!("File:        {}", path.display());
    println!("Format:      {} {}-bit", format_str, info.bits_per_sample);
    println!("Channels:    {}", info.channels);
    println!("Sample Rate: {} Hz", info.sample_rate);
    println!(
        "Duration:    {:.3}s ({} frames)",
        info.duration_secs, info.num_frames
    );
    Ok(())
}

fn model_info(path: &Path) -> anyhow::Result<()> {
    let model = load_model(path)?;
    let kernel_len = model.kernels().first().map_or(0, |k| k.len());

    println!("File:        {}", path.display());
    println!("Family:      {}", model.functions()[0].family());
    println!("Branches:    {}", model.branches());
    println!("Sample Rate: {} Hz", model.sampling_rate());
    println!("Kernels:     {} samples", kernel_len);
    println!("Aliasing:    {}", model.aliasing());

    // Peak gain of every kernel channel
    let fft = Fft::new(kernel_len.max(1));
    println!("\n  {:>6}  {:>7}  {:>14}  {:>10}", "Degree", "Channel", "Peak (dB)", "at (Hz)");
    println!("  {:>6}  {:>7}  {:>14}  {:>10}", "------", "-------", "---------", "-------");
    for (function, kernel) in model.functions().iter().zip(model.kernels()) {
        for (c, channel) in kernel.channels().iter().enumerate() {
            let db = magnitude_db(&fft.forward(channel));
            let (bin, peak) = db
                .iter()
                .copied()
                .enumerate()
                .fold((0, f64::NEG_INFINITY), |best, (i, v)| if v > best.1 { (i, v) } else { best });
            let freq = bin as f64 * model.sampling_rate() / fft.size() as f64;
            println!(
                "  {:>6}  {:>7}  {:>14.1}  {:>10.1}",
                function.degree(),
                c,
                peak,
                freq
            );
        }
    }
    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
