//! CLI implementation for `mbutils switch`

use anyhow::{Context, Result};

use crate::core::settings::Settings;
use crate::core::switch::switch_rom_outcome;
use crate::infra::props::PropFiles;
use crate::infra::switcher::BootImageSwitcher;

/// Execute the switch command
pub fn execute(settings: &Settings, rom_id: &str, force: bool) -> Result<()> {
    let properties = PropFiles::load(&settings.property_files())
        .context("Failed to read system properties")?;
    let switcher = BootImageSwitcher::new(settings.multiboot_dir());

    let outcome = switch_rom_outcome(settings, &properties, &switcher, rom_id, force)
        .with_context(|| format!("Failed to switch to ROM '{rom_id}'"))?;

    if !outcome.is_success() {
        anyhow::bail!("Failed to switch to ROM '{}': {}", rom_id, outcome);
    }

    println!("✓ Switched to ROM '{rom_id}'");
    Ok(())
}
