//! Identification command.

use clap::Args;
use hgm_io::{read_signal, save_model, write_signal};
use std::path::PathBuf;

use super::common::{CliAliasing, SessionArgs, format_branches};

#[derive(Args)]
pub struct IdentifyArgs {
    /// Recorded response to the sweep written by `hgm excite`
    #[arg(value_name = "RESPONSE")]
    response: PathBuf,

    /// Output model JSON file
    #[arg(short, long)]
    output: PathBuf,

    /// Kernel length in samples
    #[arg(long)]
    filter_length: Option<usize>,

    /// Aliasing compensation stored with the model
    #[arg(long, value_enum)]
    aliasing: Option<CliAliasing>,

    /// Also write each kernel as a WAV file into this directory
    #[arg(long)]
    kernels: Option<PathBuf>,

    #[command(flatten)]
    session: SessionArgs,
}

pub fn run(args: IdentifyArgs) -> anyhow::Result<()> {
    let mut config = args.session.resolve()?;
    if let Some(length) = args.filter_length {
        config.filter_length = Some(length);
    }
    if let Some(aliasing) = args.aliasing {
        config.aliasing_compensation = aliasing.into();
    }

    let identification = config.to_identification()?;
    let context = identification.excitation()?;
    let expected = context.excitation().len();

    let mut response = read_signal(&args.response)?;
    if response.len() > expected {
        tracing::warn!(
            recorded = response.len(),
            expected,
            "response longer than the excitation, trimming the tail"
        );
        response = response.crop(0, expected);
    }

    println!("Identifying {}...", args.response.display());
    println!(
        "  {} channels, {} samples, {} Hz",
        response.num_channels(),
        response.len(),
        response.sampling_rate()
    );

    let identified = identification.identify(&context, &response)?;

    if let Some(dir) = &args.kernels {
        std::fs::create_dir_all(dir)?;
        for (kernel, branch) in identified.kernels().iter().zip(&config.branches) {
            let path = dir.join(format!("branch_{branch}.wav"));
            write_signal(&path, kernel, 32)?;
        }
        println!("  Wrote kernels to {}", dir.display());
    }

    let model = identified.into_model(config.aliasing_compensation)?;
    save_model(&args.output, &model)?;

    println!("\nModel:       {}", args.output.display());
    println!("Branches:    {}", format_branches(&config.branches));
    println!("Family:      {}", identification.family());
    println!(
        "Kernels:     {} samples",
        model.kernels().first().map_or(0, |k| k.len())
    );
    println!("Aliasing:    {}", model.aliasing());

    Ok(())
}
