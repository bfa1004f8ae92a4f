//! Error types for mbutils
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Device catalog and hardware matching errors
#[derive(Error, Debug)]
pub enum DeviceError {
    /// Catalog file could not be read
    #[error("Failed to read device definitions '{path}': {error}")]
    Io { path: PathBuf, error: String },

    /// Catalog file is not a valid device list
    #[error("Failed to load device definitions '{path}': {error}")]
    Parse { path: PathBuf, error: String },

    /// No valid record lists the running hardware
    #[error("Unknown device: {codename}")]
    NotFound { codename: String },
}

/// ROM switching errors
#[derive(Error, Debug)]
pub enum SwitchError {
    /// No device definitions file was configured
    #[error("No device definitions file specified")]
    NoDevicesFile,

    /// Device detection failed
    #[error("Failed to detect device: {0}")]
    Device(#[from] DeviceError),

    /// None of the device's boot partition candidates is a block device
    #[error("All specified boot partition paths could not be found: {}", candidates.join(", "))]
    BootDeviceNotFound { candidates: Vec<String> },
}

/// Wipe dispatch errors
#[derive(Error, Debug)]
pub enum WipeError {
    /// ROM id does not name an installed ROM
    #[error("ROM '{id}' is not installed")]
    RomNotFound { id: String },

    /// Installed ROMs could not be enumerated
    #[error("Failed to enumerate installed ROMs: {0}")]
    Enumerate(#[from] RomError),
}

/// ROM enumeration and configuration errors
#[derive(Error, Debug)]
pub enum RomError {
    /// IO error while scanning a multiboot directory
    #[error("IO error for '{path}': {error}")]
    Io { path: PathBuf, error: String },

    /// ROM config file exists but is malformed
    #[error("Failed to parse ROM config '{path}': {error}")]
    Config { path: PathBuf, error: String },
}

/// Installer archive generation errors
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Destination archive could not be created
    #[error("Failed to open '{path}' for writing: {error}")]
    Open { path: PathBuf, error: String },

    /// Template tree is not a directory
    #[error("Template directory not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// Template tree entry could not be read
    #[error("Failed to read '{path}': {error}")]
    Read { path: PathBuf, error: String },

    /// Archive entry could not be written
    #[error("Failed to add '{name}' to archive: {error}")]
    Write { name: String, error: String },

    /// Archive could not be finalized
    #[error("Failed to finalize '{path}': {error}")]
    Close { path: PathBuf, error: String },
}

/// Settings file errors
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Failed to read settings file
    #[error("Failed to read settings file '{path}': {error}")]
    Read { path: String, error: String },

    /// Failed to parse settings file
    #[error("Failed to parse settings file '{path}': {error}")]
    Parse { path: String, error: String },
}

/// Malformed command-line invocation
#[derive(Error, Debug, PartialEq, Eq)]
pub enum UsageError {
    /// No action given
    #[error("No action specified")]
    MissingAction,

    /// `--force` given with an action other than `switch`
    #[error("--force is only valid for the 'switch' action (got '{action}')")]
    ForceNotAllowed { action: String },
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to remove a file or directory
    #[error("Failed to remove '{path}': {error}")]
    Remove { path: PathBuf, error: String },

    /// Failed to read file
    #[error("Failed to read file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },

    /// Failed to list a directory
    #[error("Failed to read directory '{path}': {error}")]
    ReadDir { path: PathBuf, error: String },
}

/// Top-level mbutils error type
#[derive(Error, Debug)]
pub enum UtilitiesError {
    /// Device error
    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    /// Switch error
    #[error("Switch error: {0}")]
    Switch(#[from] SwitchError),

    /// Wipe error
    #[error("Wipe error: {0}")]
    Wipe(#[from] WipeError),

    /// ROM error
    #[error("ROM error: {0}")]
    Rom(#[from] RomError),

    /// Archive error
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// Settings error
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// Usage error
    #[error("Usage error: {0}")]
    Usage(#[from] UsageError),

    /// Filesystem error
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),
}
