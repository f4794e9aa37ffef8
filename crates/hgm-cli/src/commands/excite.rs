//! Excitation generation command.

use clap::Args;
use hgm_analysis::harmonic::separable_orders;
use hgm_io::write_signal;
use std::path::PathBuf;

use super::common::{SessionArgs, format_branches};

#[derive(Args)]
pub struct ExciteArgs {
    /// Output WAV file for the sweep
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Also write the inverse filter to this WAV file
    #[arg(long)]
    inverse: Option<PathBuf>,

    /// Bits per sample (8, 16, 24 or 32 for float)
    #[arg(long, default_value = "32")]
    bits: u16,

    #[command(flatten)]
    session: SessionArgs,
}

pub fn run(args: ExciteArgs) -> anyhow::Result<()> {
    let config = args.session.resolve()?;
    let identification = config.to_identification()?;
    let context = identification.excitation()?;
    let generator = context.generator();

    write_signal(&args.output, context.excitation(), args.bits)?;
    if let Some(path) = &args.inverse {
        write_signal(path, context.reversed_excitation(), args.bits)?;
    }

    let separable = separable_orders(generator, generator.length());
    let highest = identification.settings().branches();
    if highest > separable {
        tracing::warn!(
            highest,
            separable,
            "sweep too short to separate every requested harmonic"
        );
    }

    println!("Excitation:  {}", args.output.display());
    println!("Method:      {} sweep", generator.kind());
    println!("Branches:    {}", format_branches(&config.branches));
    println!(
        "Length:      {} samples ({:.3}s at {} Hz)",
        generator.length(),
        generator.length() as f64 / generator.sampling_rate(),
        generator.sampling_rate()
    );
    println!("Sweep rate:  {:.6}", generator.sweep_rate());
    println!(
        "Range:       {} Hz - {} Hz",
        config.excitation.start_freq, config.excitation.stop_freq
    );
    if let Some(path) = &args.inverse {
        println!("Inverse:     {}", path.display());
    }

    Ok(())
}
