//! Device definitions and hardware detection
//!
//! The device catalog is a JSON array of device records:
//!
//! ```json
//! [{
//!     "id": "hammerhead",
//!     "codenames": ["hammerhead"],
//!     "name": "Google Nexus 5",
//!     "architecture": "armeabi-v7a",
//!     "block_devs": {
//!         "base_dirs": ["/dev/block/platform/msm_sdcc.1/by-name"],
//!         "boot": ["/dev/block/platform/msm_sdcc.1/by-name/boot"],
//!         "system": ["/dev/block/platform/msm_sdcc.1/by-name/system"]
//!     }
//! }]
//! ```
//!
//! The running device is matched by `ro.product.device` or
//! `ro.build.product` against each valid record's codenames.

use serde::Deserialize;
use std::fmt;
use std::path::Path;

use crate::config::defaults::{PROP_BUILD_PRODUCT, PROP_PRODUCT_DEVICE};
use crate::error::DeviceError;
use crate::infra::props::PropertySource;

/// CPU architectures a device record may declare
pub const ARCHITECTURES: &[&str] = &["armeabi-v7a", "arm64-v8a", "x86", "x86_64"];

/// A device definition
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct DeviceRecord {
    /// Unique device id
    #[serde(default)]
    pub id: String,

    /// Hardware codenames reported by the device's properties
    #[serde(default)]
    pub codenames: Vec<String>,

    /// Marketing name
    #[serde(default)]
    pub name: String,

    /// CPU architecture (one of [`ARCHITECTURES`])
    #[serde(default)]
    pub architecture: String,

    /// Block device paths
    #[serde(default)]
    pub block_devs: BlockDevs,
}

/// Block device paths of a device record
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct BlockDevs {
    /// Directories containing by-name partition links
    #[serde(default)]
    pub base_dirs: Vec<String>,

    /// Boot partition candidates, in priority order
    #[serde(default)]
    pub boot: Vec<String>,

    #[serde(default)]
    pub system: Vec<String>,

    #[serde(default)]
    pub cache: Vec<String>,

    #[serde(default)]
    pub data: Vec<String>,

    #[serde(default)]
    pub recovery: Vec<String>,

    #[serde(default)]
    pub extra: Vec<String>,
}

/// Problem found while validating a device record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    MissingId,
    MissingCodenames,
    MissingName,
    MissingArchitecture,
    InvalidArchitecture(String),
    MissingBootBlockDevs,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingId => write!(f, "missing id"),
            Self::MissingCodenames => write!(f, "missing codenames"),
            Self::MissingName => write!(f, "missing name"),
            Self::MissingArchitecture => write!(f, "missing architecture"),
            Self::InvalidArchitecture(arch) => write!(f, "invalid architecture '{arch}'"),
            Self::MissingBootBlockDevs => write!(f, "missing boot block devices"),
        }
    }
}

impl DeviceRecord {
    /// Check the record for missing or invalid fields
    ///
    /// An empty result means the record is usable.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if self.id.is_empty() {
            issues.push(ValidationIssue::MissingId);
        }
        if self.codenames.iter().all(String::is_empty) {
            issues.push(ValidationIssue::MissingCodenames);
        }
        if self.name.is_empty() {
            issues.push(ValidationIssue::MissingName);
        }
        if self.architecture.is_empty() {
            issues.push(ValidationIssue::MissingArchitecture);
        } else if !ARCHITECTURES.contains(&self.architecture.as_str()) {
            issues.push(ValidationIssue::InvalidArchitecture(self.architecture.clone()));
        }
        if self.block_devs.boot.is_empty() {
            issues.push(ValidationIssue::MissingBootBlockDevs);
        }

        issues
    }

    /// Whether any non-empty codename equals one of `identities`
    pub fn matches(&self, identities: &[&str]) -> bool {
        self.codenames
            .iter()
            .any(|codename| !codename.is_empty() && identities.contains(&codename.as_str()))
    }

    /// Boot partition candidates, in priority order
    pub fn boot_block_devs(&self) -> &[String] {
        &self.block_devs.boot
    }

    /// By-name partition directories
    pub fn block_dev_base_dirs(&self) -> &[String] {
        &self.block_devs.base_dirs
    }
}

/// Parse a device catalog
pub fn parse_catalog(json: &[u8]) -> Result<Vec<DeviceRecord>, serde_json::Error> {
    serde_json::from_slice(json)
}

/// Return the first valid record matching either identity string
///
/// Invalid records are skipped with a warning.
pub fn find_device(
    catalog: Vec<DeviceRecord>,
    product_device: &str,
    build_product: &str,
) -> Option<DeviceRecord> {
    let identities = [product_device, build_product];

    catalog.into_iter().find(|device| {
        let issues = device.validate();
        if !issues.is_empty() {
            let issues: Vec<String> = issues.iter().map(ToString::to_string).collect();
            tracing::warn!(
                "Skipping invalid device '{}': {}",
                device.id,
                issues.join(", ")
            );
            return false;
        }
        device.matches(&identities)
    })
}

/// Load the catalog at `path` and return the record for the running device
///
/// The device is identified by `ro.product.device` and `ro.build.product`.
/// The first valid record listing either as a codename wins.
///
/// # Arguments
///
/// * `path` - Path to the JSON device catalog
/// * `properties` - System properties of the running device
///
/// # Returns
///
/// * `Ok(DeviceRecord)` - The matching record
/// * `Err(DeviceError::Io)` - If the catalog cannot be read
/// * `Err(DeviceError::Parse)` - If the catalog is not a JSON array of records
/// * `Err(DeviceError::NotFound)` - If no valid record matches
pub fn resolve_device(
    path: &Path,
    properties: &dyn PropertySource,
) -> Result<DeviceRecord, DeviceError> {
    let product_device = properties.get_string(PROP_PRODUCT_DEVICE, "");
    let build_product = properties.get_string(PROP_BUILD_PRODUCT, "");

    tracing::debug!("{} = {}", PROP_PRODUCT_DEVICE, product_device);
    tracing::debug!("{} = {}", PROP_BUILD_PRODUCT, build_product);

    let contents = std::fs::read(path).map_err(|e| DeviceError::Io {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    let catalog = parse_catalog(&contents).map_err(|e| DeviceError::Parse {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    let device = find_device(catalog, &product_device, &build_product).ok_or_else(|| {
        DeviceError::NotFound {
            codename: product_device.clone(),
        }
    })?;

    tracing::debug!("Detected device: {} ({})", device.id, device.name);
    Ok(device)
}
