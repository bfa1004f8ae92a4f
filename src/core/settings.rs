//! Runtime settings
//!
//! Reads `utilities.toml` (or the file named by `--config`/`MBUTILS_CONFIG`).
//! Every setting is optional; unset values fall back to the on-device
//! defaults in [`crate::config::defaults`]. Settings are loaded once at
//! startup and passed by reference from then on.
//!
//! ```toml
//! devices_file = "/data/multiboot/devices.json"
//!
//! [properties]
//! files = ["/default.prop", "/system/build.prop"]
//!
//! [partitions]
//! system = "/raw/system"
//! extsd = "/mnt/media_rw/sdcard1"
//!
//! [multiboot]
//! data_dir = "/data/multiboot"
//! config_dir = "/data/media/0/MultiBoot"
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::defaults;
use crate::error::SettingsError;

/// Top-level settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Device definitions (JSON catalog) used for device detection
    #[serde(default)]
    pub devices_file: Option<PathBuf>,

    /// System property sources
    #[serde(default)]
    pub properties: PropertiesConfig,

    /// Partition mount point overrides
    #[serde(default)]
    pub partitions: PartitionsConfig,

    /// Multiboot directories
    #[serde(default)]
    pub multiboot: MultibootConfig,
}

/// System property sources
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertiesConfig {
    /// Prop files, highest priority first
    pub files: Option<Vec<PathBuf>>,
}

/// Partition mount point overrides
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartitionsConfig {
    pub system: Option<PathBuf>,
    pub cache: Option<PathBuf>,
    pub data: Option<PathBuf>,
    pub extsd: Option<PathBuf>,
}

/// Multiboot directories
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MultibootConfig {
    /// Boot images and checksums
    pub data_dir: Option<PathBuf>,

    /// Per-ROM `config.json` files
    pub config_dir: Option<PathBuf>,
}

impl Settings {
    /// Load settings from a specific path
    ///
    /// If the file doesn't exist, returns default settings.
    /// If the file exists but is invalid, returns an error.
    pub fn load_from_path(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            tracing::debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| SettingsError::Read {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| SettingsError::Parse {
            path: path.display().to_string(),
            error: e.to_string(),
        })
    }

    /// Load from `path` if given, otherwise from the default location
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load_from_path(Path::new(defaults::DEFAULT_SETTINGS_FILE)),
        }
    }

    /// Replace the device definitions file when `devices_file` is set
    #[must_use]
    pub fn with_devices_file(mut self, devices_file: Option<PathBuf>) -> Self {
        if devices_file.is_some() {
            self.devices_file = devices_file;
        }
        self
    }

    /// Effective property files
    #[must_use]
    pub fn property_files(&self) -> Vec<PathBuf> {
        self.properties.files.clone().unwrap_or_else(|| {
            defaults::DEFAULT_PROPERTY_FILES
                .iter()
                .map(PathBuf::from)
                .collect()
        })
    }

    /// Effective multiboot data directory
    #[must_use]
    pub fn multiboot_dir(&self) -> PathBuf {
        self.multiboot
            .data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(defaults::DEFAULT_MULTIBOOT_DIR))
    }

    /// Effective per-ROM config directory
    #[must_use]
    pub fn multiboot_config_dir(&self) -> PathBuf {
        self.multiboot
            .config_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(defaults::DEFAULT_MULTIBOOT_CONFIG_DIR))
    }
}
