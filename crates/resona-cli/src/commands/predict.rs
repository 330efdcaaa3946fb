//! The `predict` command: model predictions without a measurement.

use clap::Args;
use resona_acoustics::{predicted_rt60, quality_description, FrequencyBand};
use std::path::PathBuf;

use crate::room_file::load_room;

#[derive(Args)]
pub struct PredictArgs {
    /// Room description JSON file
    #[arg(value_name = "ROOM")]
    room: PathBuf,

    /// Leave air absorption out of the predictions
    #[arg(long)]
    no_air: bool,
}

pub fn run(args: PredictArgs) -> anyhow::Result<()> {
    let room = load_room(&args.room)?;

    println!(
        "Room '{}': {:.1} x {:.1} x {:.1} m, {:.0} m3",
        room.name, room.width_m, room.length_m, room.height_m, room.volume_m3()
    );
    println!(
        "  {} surfaces, {:.0} m2 boundary, {:.0} C, {:.0}% RH",
        room.surfaces.len(),
        room.total_surface_area_m2(),
        room.temperature_c,
        room.humidity_pct
    );

    let (sabine, eyring) = predicted_rt60(&room, !args.no_air)?;

    println!();
    println!("  {:>8}  {:>10}  {:>10}", "Band", "Sabine (s)", "Eyring (s)");
    println!("  {:>8}  {:>10}  {:>10}", "----", "----------", "----------");
    for band in FrequencyBand::ALL {
        println!(
            "  {:>8}  {:>10.2}  {:>10.2}",
            band.to_string(),
            sabine.get(band),
            eyring.get(band)
        );
    }

    println!();
    println!(
        "  Average: {:.2} s (Sabine), {:.2} s (Eyring)",
        sabine.average(),
        eyring.average()
    );
    println!("  Room character: {}", quality_description(sabine.average()));

    Ok(())
}
