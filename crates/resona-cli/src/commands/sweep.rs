//! The `sweep` command: synthesize the ESS excitation and inverse filter.

use clap::Args;
use resona_acoustics::{generate_inverse, generate_sweep, SweepParams};
use resona_io::write_mono;
use std::path::PathBuf;

#[derive(Args)]
pub struct SweepArgs {
    /// Output WAV file for the excitation sweep
    #[arg(short, long, default_value = "sweep.wav")]
    output: PathBuf,

    /// Also write the matched inverse filter (optional)
    #[arg(long)]
    inverse: Option<PathBuf>,

    /// Sample rate in Hz
    #[arg(long, default_value = "48000")]
    rate: u32,

    /// Start frequency in Hz
    #[arg(long, default_value = "20")]
    start: f32,

    /// End frequency in Hz
    #[arg(long, default_value = "20000")]
    end: f32,

    /// Duration in seconds
    #[arg(long, default_value = "3")]
    duration: f32,
}

pub fn run(args: SweepArgs) -> anyhow::Result<()> {
    let params = SweepParams {
        start_hz: args.start,
        end_hz: args.end,
        duration_s: args.duration,
    };

    let sweep = generate_sweep(args.rate, &params)?;
    write_mono(&args.output, &sweep, args.rate)?;
    println!(
        "Wrote {:.1}s sweep ({:.0} Hz to {:.0} Hz) to {}",
        args.duration,
        args.start,
        args.end,
        args.output.display()
    );

    if let Some(inverse_path) = args.inverse {
        let inverse = generate_inverse(args.rate, &params)?;
        write_mono(&inverse_path, &inverse, args.rate)?;
        println!("Wrote inverse filter to {}", inverse_path.display());
    }

    Ok(())
}
