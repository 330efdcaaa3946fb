//! The `materials` command: list built-in absorption presets.

use clap::Args;
use resona_acoustics::{materials, FrequencyBand};

#[derive(Args)]
pub struct MaterialsArgs {}

pub fn run(_args: MaterialsArgs) -> anyhow::Result<()> {
    print!("  {:<16}", "Material");
    for band in FrequencyBand::ALL {
        print!("  {:>7}", band.to_string());
    }
    println!();

    print!("  {:<16}", "--------");
    for _ in FrequencyBand::ALL {
        print!("  {:>7}", "-------");
    }
    println!();

    for material in materials::all() {
        print!("  {:<16}", material.name);
        for band in FrequencyBand::ALL {
            print!("  {:>7.2}", material.alpha(band));
        }
        println!();
    }

    Ok(())
}
