//! Filesystem-backed wipe primitives

use std::path::PathBuf;

use crate::core::roms::RomHandle;
use crate::core::wipe::RomWiper;
use crate::error::FilesystemError;
use crate::infra::filesystem;

/// Entries under a ROM's system or cache directory that survive a wipe
///
/// For `primary` these directories are the partition roots, whose
/// `multiboot` directory holds the other ROMs.
const PARTITION_WIPE_EXCLUSIONS: &[&str] = &["multiboot"];

/// Entries under a ROM's data directory that survive a data wipe
///
/// `media` is the internal storage and `multiboot` holds the other ROMs.
const DATA_WIPE_EXCLUSIONS: &[&str] = &["media", "multiboot"];

/// Wipes ROM directories by deleting their contents
#[derive(Debug, Clone)]
pub struct FsWiper {
    multiboot_dir: PathBuf,
    config_dir: PathBuf,
}

impl FsWiper {
    /// Create a wiper; `multiboot_dir` holds boot images, `config_dir` per-ROM configs
    pub fn new(multiboot_dir: PathBuf, config_dir: PathBuf) -> Self {
        Self {
            multiboot_dir,
            config_dir,
        }
    }
}

fn report(what: &str, rom: &RomHandle, result: Result<(), FilesystemError>) -> bool {
    match result {
        Ok(()) => {
            tracing::debug!("Wiped {} of {}", what, rom.id());
            true
        }
        Err(e) => {
            tracing::error!("Failed to wipe {} of {}: {}", what, rom.id(), e);
            false
        }
    }
}

impl RomWiper for FsWiper {
    fn wipe_system(&self, rom: &RomHandle) -> bool {
        report(
            "system",
            rom,
            filesystem::remove_dir_contents(&rom.system_path, PARTITION_WIPE_EXCLUSIONS),
        )
    }

    fn wipe_cache(&self, rom: &RomHandle) -> bool {
        report(
            "cache",
            rom,
            filesystem::remove_dir_contents(&rom.cache_path, PARTITION_WIPE_EXCLUSIONS),
        )
    }

    fn wipe_data(&self, rom: &RomHandle) -> bool {
        report(
            "data",
            rom,
            filesystem::remove_dir_contents(&rom.data_path, DATA_WIPE_EXCLUSIONS),
        )
    }

    fn wipe_dalvik_cache(&self, rom: &RomHandle) -> bool {
        let result = filesystem::remove_path(&rom.data_path.join("dalvik-cache"))
            .and_then(|()| filesystem::remove_path(&rom.cache_path.join("dalvik-cache")));
        report("dalvik-cache", rom, result)
    }

    fn wipe_multiboot(&self, rom: &RomHandle) -> bool {
        let result = filesystem::remove_path(&self.config_dir.join(rom.id()))
            .and_then(|()| filesystem::remove_path(&self.multiboot_dir.join(rom.id())));
        report("multiboot files", rom, result)
    }
}
