//! CLI implementation for the `mbutils wipe-*` commands

use anyhow::Result;

use crate::core::layout::PartitionLayout;
use crate::core::roms::InstalledRoms;
use crate::core::settings::Settings;
use crate::core::wipe::{WipeDispatcher, WipeTarget};
use crate::infra::wiper::FsWiper;

/// Execute a wipe command
pub fn execute(settings: &Settings, target: WipeTarget, rom_id: &str) -> Result<()> {
    let config_dir = settings.multiboot_config_dir();
    let roms = InstalledRoms::new(
        PartitionLayout::detect(&settings.partitions),
        config_dir.clone(),
    );
    let wiper = FsWiper::new(settings.multiboot_dir(), config_dir);

    if !WipeDispatcher::new(&roms, &wiper).wipe(target, rom_id)? {
        anyhow::bail!("Failed to wipe {} of ROM '{}'", target, rom_id);
    }

    println!("✓ Wiped {target} of ROM '{rom_id}'");
    Ok(())
}
