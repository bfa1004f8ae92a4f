//! CLI implementation for `mbutils generate`

use std::path::Path;

use anyhow::{Context, Result};

use crate::core::installer;
use crate::core::layout::PartitionLayout;
use crate::core::roms::{InstalledRoms, RomProvider};
use crate::core::settings::Settings;
use crate::core::template::{MenuRom, TemplateContext};
use crate::core::version;

/// Execute the generate command
pub fn execute(settings: &Settings, template_dir: &Path, output: &Path) -> Result<()> {
    let layout = PartitionLayout::detect(&settings.partitions);
    tracing::debug!("Partition layout: {:?}", layout);

    let roms = InstalledRoms::new(layout.clone(), settings.multiboot_config_dir())
        .installed()
        .context("Failed to enumerate installed ROMs")?;

    let context = TemplateContext {
        version: version::version(),
        roms: roms.iter().map(MenuRom::from).collect(),
        layout,
    };

    let report = installer::generate(template_dir, output, &context)
        .with_context(|| format!("Failed to generate {}", output.display()))?;

    println!(
        "✓ Generated {} ({} ROMs, {} files)",
        output.display(),
        context.roms.len(),
        report.entries.len()
    );
    for skipped in &report.skipped {
        println!("  Skipped {}", skipped.path.display());
    }

    Ok(())
}
