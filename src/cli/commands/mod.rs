//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod generate;
pub mod switch;
pub mod wipe;

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use crate::core::settings::Settings;
use crate::core::wipe::WipeTarget;

/// Available actions
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the AROMA installer zip from a template directory
    Generate {
        /// Template directory
        template_dir: PathBuf,

        /// Output zip file
        output: PathBuf,
    },

    /// Switch to another ROM
    Switch {
        /// ROM ID
        rom_id: String,
    },

    /// Wipe a ROM's system directory
    WipeSystem {
        /// ROM ID
        rom_id: String,
    },

    /// Wipe a ROM's cache directory
    WipeCache {
        /// ROM ID
        rom_id: String,
    },

    /// Wipe a ROM's data directory (internal storage is kept)
    WipeData {
        /// ROM ID
        rom_id: String,
    },

    /// Wipe a ROM's dalvik-cache
    WipeDalvikCache {
        /// ROM ID
        rom_id: String,
    },

    /// Remove a ROM's multiboot files (boot image, config)
    WipeMultiboot {
        /// ROM ID
        rom_id: String,
    },
}

impl Commands {
    /// Action keyword as typed on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Self::Generate { .. } => "generate",
            Self::Switch { .. } => "switch",
            Self::WipeSystem { .. } => "wipe-system",
            Self::WipeCache { .. } => "wipe-cache",
            Self::WipeData { .. } => "wipe-data",
            Self::WipeDalvikCache { .. } => "wipe-dalvik-cache",
            Self::WipeMultiboot { .. } => "wipe-multiboot",
        }
    }

    /// Execute the command
    pub fn run(self, settings: &Settings, force: bool) -> Result<()> {
        match self {
            Self::Generate {
                template_dir,
                output,
            } => generate::execute(settings, &template_dir, &output),
            Self::Switch { rom_id } => switch::execute(settings, &rom_id, force),
            Self::WipeSystem { rom_id } => wipe::execute(settings, WipeTarget::System, &rom_id),
            Self::WipeCache { rom_id } => wipe::execute(settings, WipeTarget::Cache, &rom_id),
            Self::WipeData { rom_id } => wipe::execute(settings, WipeTarget::Data, &rom_id),
            Self::WipeDalvikCache { rom_id } => {
                wipe::execute(settings, WipeTarget::DalvikCache, &rom_id)
            }
            Self::WipeMultiboot { rom_id } => {
                wipe::execute(settings, WipeTarget::Multiboot, &rom_id)
            }
        }
    }
}
