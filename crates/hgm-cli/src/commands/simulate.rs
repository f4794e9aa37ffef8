//! Model simulation command.

use clap::Args;
use hgm_analysis::HammersteinGroupModel;
use hgm_io::{load_model, read_signal, write_signal};
use std::path::PathBuf;

use super::common::CliAliasing;

#[derive(Args)]
pub struct SimulateArgs {
    /// Model JSON file written by `hgm identify`
    #[arg(value_name = "MODEL")]
    model: PathBuf,

    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(short, long)]
    output: PathBuf,

    /// Override the model's aliasing compensation
    #[arg(long, value_enum)]
    aliasing: Option<CliAliasing>,

    /// Bits per sample (8, 16, 24 or 32 for float)
    #[arg(long, default_value = "32")]
    bits: u16,
}

pub fn run(args: SimulateArgs) -> anyhow::Result<()> {
    let mut model = load_model(&args.model)?;
    if let Some(aliasing) = args.aliasing {
        model = HammersteinGroupModel::new(
            model.functions().to_vec(),
            model.kernels().to_vec(),
            aliasing.into(),
        )?
        .with_downsampling_position(model.downsampling_position());
    }

    let input = read_signal(&args.input)?;
    println!("Simulating {}...", args.input.display());
    println!(
        "  {} branches, aliasing compensation {}",
        model.branches(),
        model.aliasing()
    );

    let output = model.process(&input)?;
    let peak = output
        .channels()
        .iter()
        .flatten()
        .fold(0.0f64, |acc, &x| acc.max(x.abs()));
    if peak > 1.0 {
        tracing::warn!(peak, "output exceeds full scale, integer formats will clip");
    }

    write_signal(&args.output, &output, args.bits)?;
    println!("  Wrote {}", args.output.display());

    Ok(())
}
