//! Resona CLI - Command-line interface for room-reverberation measurement.

mod commands;
mod room_file;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "resona")]
#[command(author, version, about = "Room reverberation measurement and prediction", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a recorded measurement against a room description
    Measure(commands::measure::MeasureArgs),

    /// Synthesize the sweep excitation and inverse filter as WAV files
    Sweep(commands::sweep::SweepArgs),

    /// Predict reverberation from a room description alone
    Predict(commands::predict::PredictArgs),

    /// List the built-in material absorption presets
    Materials(commands::materials::MaterialsArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Measure(args) => commands::measure::run(args),
        Commands::Sweep(args) => commands::sweep::run(args),
        Commands::Predict(args) => commands::predict::run(args),
        Commands::Materials(args) => commands::materials::run(args),
    }
}
