//! ROM switching
//!
//! Detects the device, picks its boot partition and hands the switch to a
//! [`RomSwitcher`]. Every outcome, checksum failures included, is final for
//! the invocation; nothing is retried.

use std::fmt;
use std::path::Path;

use super::device::resolve_device;
use super::settings::Settings;
use crate::error::SwitchError;
use crate::infra::filesystem;
use crate::infra::props::PropertySource;

/// Outcome of a switch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchRomResult {
    /// The ROM's boot image was written
    Succeeded,
    /// The switch failed (missing image, I/O error, ...)
    Failed,
    /// The boot image does not match its recorded checksum
    ChecksumInvalid,
    /// No checksum is recorded for the boot image
    ChecksumNotFound,
}

impl SwitchRomResult {
    /// Log label of the outcome
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::ChecksumInvalid => "CHECKSUM_INVALID",
            Self::ChecksumNotFound => "CHECKSUM_NOT_FOUND",
        }
    }

    pub fn is_success(self) -> bool {
        self == Self::Succeeded
    }
}

impl fmt::Display for SwitchRomResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Low-level switch primitive
pub trait RomSwitcher {
    /// Make `rom_id` the ROM booted from `boot_blockdev`
    ///
    /// `block_dev_base_dirs` are the by-name directories used to locate any
    /// other partitions the ROM ships images for. `force` skips checksum
    /// verification.
    fn switch_rom(
        &self,
        rom_id: &str,
        boot_blockdev: &Path,
        block_dev_base_dirs: &[String],
        force: bool,
    ) -> SwitchRomResult;
}

/// First candidate that exists and is a block device
pub fn find_boot_block_device(candidates: &[String]) -> Option<&str> {
    find_boot_block_device_with(candidates, filesystem::is_block_device)
}

/// First candidate accepted by `is_block`
pub fn find_boot_block_device_with(
    candidates: &[String],
    is_block: impl Fn(&Path) -> bool,
) -> Option<&str> {
    candidates
        .iter()
        .map(String::as_str)
        .find(|path| is_block(Path::new(path)))
}

/// Switch to `rom_id`, returning the primitive's outcome
///
/// Detects the device from `properties` and the catalog named in
/// `settings`, selects the first boot partition candidate that is a block
/// device and runs `switcher` once.
///
/// # Arguments
///
/// * `settings` - Settings naming the device definitions file
/// * `properties` - System properties used for device detection
/// * `switcher` - Primitive that performs the switch
/// * `rom_id` - Id of the ROM to boot
/// * `force` - Skip checksum verification
///
/// # Returns
///
/// * `Ok(SwitchRomResult)` - The primitive's outcome, unchanged
/// * `Err(SwitchError)` - If no catalog is configured, the device is unknown
///   or no boot partition candidate is a block device
pub fn switch_rom_outcome(
    settings: &Settings,
    properties: &dyn PropertySource,
    switcher: &dyn RomSwitcher,
    rom_id: &str,
    force: bool,
) -> Result<SwitchRomResult, SwitchError> {
    switch_rom_outcome_with(
        settings,
        properties,
        switcher,
        rom_id,
        force,
        filesystem::is_block_device,
    )
}

/// [`switch_rom_outcome`] with a custom block device check
pub fn switch_rom_outcome_with(
    settings: &Settings,
    properties: &dyn PropertySource,
    switcher: &dyn RomSwitcher,
    rom_id: &str,
    force: bool,
    is_block: impl Fn(&Path) -> bool,
) -> Result<SwitchRomResult, SwitchError> {
    let devices_file = settings
        .devices_file
        .as_deref()
        .ok_or(SwitchError::NoDevicesFile)?;

    let device = resolve_device(devices_file, properties)?;

    let boot_blockdev = find_boot_block_device_with(device.boot_block_devs(), is_block).ok_or_else(|| {
        SwitchError::BootDeviceNotFound {
            candidates: device.boot_block_devs().to_vec(),
        }
    })?;
    tracing::debug!("Using boot partition: {}", boot_blockdev);

    let result = switcher.switch_rom(
        rom_id,
        Path::new(boot_blockdev),
        device.block_dev_base_dirs(),
        force,
    );
    tracing::debug!("{}", result);

    Ok(result)
}

/// Switch to `rom_id`
///
/// # Arguments
///
/// * `settings`, `properties`, `switcher`, `force` - As for [`switch_rom_outcome`]
/// * `rom_id` - Id of the ROM to boot
///
/// # Returns
///
/// * `Ok(true)` - The switch succeeded
/// * `Ok(false)` - The switch primitive reported any other outcome
/// * `Err(SwitchError)` - As for [`switch_rom_outcome`]
pub fn switch_rom(
    settings: &Settings,
    properties: &dyn PropertySource,
    switcher: &dyn RomSwitcher,
    rom_id: &str,
    force: bool,
) -> Result<bool, SwitchError> {
    switch_rom_outcome(settings, properties, switcher, rom_id, force).map(SwitchRomResult::is_success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeviceError;
    use crate::infra::props::MapProperties;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingSwitcher {
        result: Option<SwitchRomResult>,
        calls: RefCell<Vec<(String, PathBuf, Vec<String>, bool)>>,
    }

    impl RomSwitcher for RecordingSwitcher {
        fn switch_rom(
            &self,
            rom_id: &str,
            boot_blockdev: &Path,
            block_dev_base_dirs: &[String],
            force: bool,
        ) -> SwitchRomResult {
            self.calls.borrow_mut().push((
                rom_id.to_string(),
                boot_blockdev.to_path_buf(),
                block_dev_base_dirs.to_vec(),
                force,
            ));
            self.result.unwrap_or(SwitchRomResult::Succeeded)
        }
    }

    fn write_catalog(temp: &TempDir, boot: &[String]) -> Settings {
        let catalog = serde_json::json!([{
            "id": "foo",
            "codenames": ["foo"],
            "name": "Foo",
            "architecture": "arm64-v8a",
            "block_devs": {
                "base_dirs": ["/dev/block/by-name"],
                "boot": boot,
            }
        }]);
        let path = temp.path().join("devices.json");
        std::fs::write(&path, catalog.to_string()).unwrap();
        Settings {
            devices_file: Some(path),
            ..Settings::default()
        }
    }

    #[test]
    fn test_missing_devices_file_is_config_error() {
        let switcher = RecordingSwitcher::default();
        let result = switch_rom(
            &Settings::default(),
            &MapProperties::new(),
            &switcher,
            "primary",
            false,
        );

        assert!(matches!(result, Err(SwitchError::NoDevicesFile)));
        assert!(switcher.calls.borrow().is_empty());
    }

    #[test]
    fn test_no_block_device_candidate() {
        let temp = TempDir::new().unwrap();
        let not_block = temp.path().join("boot.img");
        std::fs::write(&not_block, b"ANDROID!").unwrap();
        let settings = write_catalog(
            &temp,
            &[
                "/dev/block/nonexistent".to_string(),
                not_block.display().to_string(),
                "/dev/null".to_string(),
            ],
        );
        let props = MapProperties::new().with("ro.product.device", "foo");
        let switcher = RecordingSwitcher::default();

        let result = switch_rom(&settings, &props, &switcher, "dual", false);

        match result {
            Err(SwitchError::BootDeviceNotFound { candidates }) => {
                assert_eq!(candidates.len(), 3);
            }
            other => panic!("expected BootDeviceNotFound, got {other:?}"),
        }
        assert!(switcher.calls.borrow().is_empty());
    }

    #[test]
    fn test_unknown_device_propagates() {
        let temp = TempDir::new().unwrap();
        let settings = write_catalog(&temp, &["/dev/block/nonexistent".to_string()]);
        let props = MapProperties::new().with("ro.product.device", "bar");
        let switcher = RecordingSwitcher::default();

        let result = switch_rom(&settings, &props, &switcher, "dual", false);
        assert!(matches!(
            result,
            Err(SwitchError::Device(DeviceError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_outcome_is_passed_through() {
        let temp = TempDir::new().unwrap();
        let settings = write_catalog(
            &temp,
            &[
                "/dev/block/nonexistent".to_string(),
                "/dev/block/by-name/boot".to_string(),
                "/dev/block/mmcblk0p19".to_string(),
            ],
        );
        let props = MapProperties::new().with("ro.build.product", "foo");
        let is_block = |path: &Path| path != Path::new("/dev/block/nonexistent");

        for expected in [
            SwitchRomResult::Succeeded,
            SwitchRomResult::Failed,
            SwitchRomResult::ChecksumInvalid,
            SwitchRomResult::ChecksumNotFound,
        ] {
            let switcher = RecordingSwitcher {
                result: Some(expected),
                ..RecordingSwitcher::default()
            };
            let outcome =
                switch_rom_outcome_with(&settings, &props, &switcher, "dual", true, is_block)
                    .unwrap();
            assert_eq!(outcome, expected);

            let calls = switcher.calls.borrow();
            assert_eq!(calls.len(), 1, "switch must not be retried");
            assert_eq!(calls[0].0, "dual");
            assert_eq!(calls[0].1, PathBuf::from("/dev/block/by-name/boot"));
            assert_eq!(calls[0].2, vec!["/dev/block/by-name".to_string()]);
            assert!(calls[0].3);
        }
    }

    #[test]
    fn test_find_boot_block_device_priority() {
        let candidates = vec!["/a".to_string(), "/b".to_string(), "/c".to_string()];

        assert_eq!(find_boot_block_device_with(&candidates, |p| p != Path::new("/a")), Some("/b"));
        assert_eq!(find_boot_block_device_with(&candidates, |_| false), None);
        assert_eq!(find_boot_block_device(&["/dev/block/nonexistent".to_string()]), None);
    }

    #[test]
    fn test_only_success_is_true() {
        assert!(SwitchRomResult::Succeeded.is_success());
        assert!(!SwitchRomResult::Failed.is_success());
        assert!(!SwitchRomResult::ChecksumInvalid.is_success());
        assert!(!SwitchRomResult::ChecksumNotFound.is_success());
        assert_eq!(SwitchRomResult::ChecksumNotFound.to_string(), "CHECKSUM_NOT_FOUND");
    }
}
