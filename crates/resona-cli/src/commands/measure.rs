//! The `measure` command: analyze a recording against a room description.

use anyhow::Context;
use clap::{Args, ValueEnum};
use resona_acoustics::{
    analyze, AnalyzeOptions, FrequencyBand, Mode, SweepParams,
};
use resona_io::read_mono;
use std::path::PathBuf;

use crate::room_file::load_room;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CaptureMode {
    /// Recording of an exponential sweep played into the room
    Ess,
    /// Recording of a clap or balloon pop
    Impulse,
    /// The file already contains an impulse response
    Raw,
}

#[derive(Args)]
pub struct MeasureArgs {
    /// Recorded WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Room description JSON file
    #[arg(short, long)]
    room: PathBuf,

    /// How the room was excited
    #[arg(long, value_enum, default_value = "ess")]
    mode: CaptureMode,

    /// Sweep start frequency in Hz (ESS mode)
    #[arg(long, default_value = "20")]
    sweep_start: f32,

    /// Sweep end frequency in Hz (ESS mode)
    #[arg(long, default_value = "20000")]
    sweep_end: f32,

    /// Sweep duration in seconds (ESS mode)
    #[arg(long, default_value = "3")]
    sweep_duration: f32,

    /// Impulse detection threshold, absolute amplitude (impulse mode)
    #[arg(long, default_value = "0.3")]
    threshold: f32,

    /// Analyze broadband instead of per octave band
    #[arg(long)]
    broadband: bool,

    /// Leave air absorption out of the model predictions
    #[arg(long)]
    no_air: bool,

    /// Write the full analysis as JSON (optional)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: MeasureArgs) -> anyhow::Result<()> {
    let room = load_room(&args.room)?;
    let (samples, sample_rate) = read_mono(&args.input)?;

    println!("Analyzing {}...", args.input.display());
    println!(
        "  {} samples, {} Hz, {:.2}s",
        samples.len(),
        sample_rate,
        samples.len() as f32 / sample_rate as f32
    );
    println!(
        "  Room '{}': {:.0} m3, {:.0} m2 boundary",
        room.name,
        room.volume_m3(),
        room.total_surface_area_m2()
    );

    let mode = match args.mode {
        CaptureMode::Ess => Mode::Ess(SweepParams {
            start_hz: args.sweep_start,
            end_hz: args.sweep_end,
            duration_s: args.sweep_duration,
        }),
        CaptureMode::Impulse => Mode::Impulse {
            threshold: args.threshold,
        },
        CaptureMode::Raw => Mode::Raw,
    };

    let options = AnalyzeOptions {
        skip_band_filter: args.broadband,
        skip_air_absorption: args.no_air,
        ..Default::default()
    };

    let analysis = analyze(&samples, sample_rate, mode, &room, &options)
        .context("analysis failed")?;

    println!();
    println!(
        "  {:>8}  {:>8}  {:>8}  {:>8}  {:>8}  {:>8}  {:>8}",
        "Band", "RT60 (s)", "EDT (s)", "T20 (s)", "T30 (s)", "Sabine", "Eyring"
    );
    println!(
        "  {:>8}  {:>8}  {:>8}  {:>8}  {:>8}  {:>8}  {:>8}",
        "----", "--------", "-------", "-------", "-------", "------", "------"
    );
    for band in FrequencyBand::ALL {
        println!(
            "  {:>8}  {:>8}  {:>8}  {:>8}  {:>8}  {:>8.2}  {:>8.2}",
            band.to_string(),
            fmt_opt(*analysis.measured_rt60_seconds.get(band)),
            fmt_opt(*analysis.edt_seconds.get(band)),
            fmt_opt(*analysis.t20_seconds.get(band)),
            fmt_opt(*analysis.t30_seconds.get(band)),
            analysis.sabine_rt60_seconds.get(band),
            analysis.eyring_rt60_seconds.get(band),
        );
    }

    println!();
    match analysis.average_measured_rt60_seconds {
        Some(avg) => println!("  Average measured RT60: {:.2} s", avg),
        None => println!("  No band produced a measured RT60"),
    }
    println!(
        "  Average predicted RT60: {:.2} s (Sabine), {:.2} s (Eyring)",
        analysis.average_sabine_rt60_seconds, analysis.average_eyring_rt60_seconds
    );
    println!("  Room character: {}", analysis.quality);

    for warning in &analysis.warnings {
        eprintln!("  warning: {}", warning);
    }

    if let Some(output_path) = args.output {
        let json = serde_json::to_string_pretty(&analysis)?;
        std::fs::write(&output_path, json)?;
        println!("\nWrote analysis to {}", output_path.display());
    }

    Ok(())
}

fn fmt_opt(value: Option<f32>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "-".to_string(),
    }
}
