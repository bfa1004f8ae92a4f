//! Boot image switcher
//!
//! Each ROM keeps its kernel in `<multiboot>/<id>/boot.img`, plus optional
//! images for other partitions in `<multiboot>/<id>/images/<partition>.img`.
//! Switching verifies every image against `<multiboot>/checksums.prop`:
//!
//! ```text
//! dual/boot.img=sha512:9b71d224bd62f378...
//! dual/images/modem.img=sha512:c2a8f1...
//! ```
//!
//! and then writes the images to their block devices.

use sha2::{Digest, Sha512};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::config::defaults::CHECKSUMS_FILE;
use crate::core::switch::{RomSwitcher, SwitchRomResult};
use crate::infra::filesystem;
use crate::infra::props::{PropFiles, PropertySource};

/// Checksum algorithm prefix in `checksums.prop`
const SHA512_PREFIX: &str = "sha512:";

/// An image to write and the block device receiving it
#[derive(Debug)]
struct FlashJob {
    key: String,
    image: PathBuf,
    target: PathBuf,
}

/// Switcher writing a ROM's stored images to the device's partitions
#[derive(Debug, Clone)]
pub struct BootImageSwitcher {
    multiboot_dir: PathBuf,
}

impl BootImageSwitcher {
    /// Create a switcher reading images from `multiboot_dir`
    pub fn new(multiboot_dir: PathBuf) -> Self {
        Self { multiboot_dir }
    }

    fn plan(
        &self,
        rom_id: &str,
        boot_blockdev: &Path,
        block_dev_base_dirs: &[String],
    ) -> Option<Vec<FlashJob>> {
        let rom_dir = self.multiboot_dir.join(rom_id);
        let boot_image = rom_dir.join("boot.img");
        if !boot_image.is_file() {
            tracing::error!("Boot image not found: {}", boot_image.display());
            return None;
        }

        let mut jobs = vec![FlashJob {
            key: format!("{rom_id}/boot.img"),
            image: boot_image,
            target: boot_blockdev.to_path_buf(),
        }];

        for image in extra_images(&rom_dir.join("images")) {
            let Some(partition) = image.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let target = block_dev_base_dirs
                .iter()
                .map(|dir| Path::new(dir).join(partition))
                .find(|path| filesystem::is_block_device(path));

            let Some(target) = target else {
                tracing::error!("No block device found for partition '{}'", partition);
                return None;
            };

            jobs.push(FlashJob {
                key: format!("{rom_id}/images/{partition}.img"),
                image,
                target,
            });
        }

        Some(jobs)
    }
}

impl RomSwitcher for BootImageSwitcher {
    fn switch_rom(
        &self,
        rom_id: &str,
        boot_blockdev: &Path,
        block_dev_base_dirs: &[String],
        force: bool,
    ) -> SwitchRomResult {
        let Some(jobs) = self.plan(rom_id, boot_blockdev, block_dev_base_dirs) else {
            return SwitchRomResult::Failed;
        };

        let checksums = match PropFiles::load_file(&self.multiboot_dir.join(CHECKSUMS_FILE)) {
            Ok(checksums) => checksums,
            Err(e) => {
                tracing::error!("{}", e);
                return SwitchRomResult::Failed;
            }
        };

        for job in &jobs {
            match verify_checksum(&checksums, job) {
                Ok(SwitchRomResult::Succeeded) => {}
                Ok(result) if force => {
                    tracing::warn!("{}: {}, continuing due to --force", job.key, result);
                }
                Ok(result) => return result,
                Err(e) => {
                    tracing::error!("{}: Failed to compute checksum: {}", job.image.display(), e);
                    return SwitchRomResult::Failed;
                }
            }
        }

        for job in &jobs {
            tracing::info!("Writing {} to {}", job.image.display(), job.target.display());
            if let Err(e) = copy_to_blockdev(&job.image, &job.target) {
                tracing::error!(
                    "Failed to write {} to {}: {}",
                    job.image.display(),
                    job.target.display(),
                    e
                );
                return SwitchRomResult::Failed;
            }
        }

        SwitchRomResult::Succeeded
    }
}

/// `.img` files in `dir`, sorted; empty if the directory is missing
fn extra_images(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut images: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "img"))
        .collect();
    images.sort();
    images
}

fn verify_checksum(checksums: &PropFiles, job: &FlashJob) -> io::Result<SwitchRomResult> {
    let Some(expected) = checksums.get(&job.key) else {
        return Ok(SwitchRomResult::ChecksumNotFound);
    };

    let Some(expected) = expected.strip_prefix(SHA512_PREFIX) else {
        tracing::warn!("{}: Unsupported checksum format: {}", job.key, expected);
        return Ok(SwitchRomResult::ChecksumInvalid);
    };

    let actual = sha512_file(&job.image)?;
    if actual.eq_ignore_ascii_case(expected) {
        Ok(SwitchRomResult::Succeeded)
    } else {
        tracing::warn!("{}: Expected {}, got {}", job.key, expected, actual);
        Ok(SwitchRomResult::ChecksumInvalid)
    }
}

/// Hex SHA-512 of a file
pub fn sha512_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha512::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

fn copy_to_blockdev(image: &Path, target: &Path) -> io::Result<()> {
    let mut source = File::open(image)?;
    let mut dest = OpenOptions::new().write(true).open(target)?;
    io::copy(&mut source, &mut dest)?;
    dest.flush()?;
    dest.sync_all()
}
