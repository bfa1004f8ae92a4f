//! Core business logic module
//!
//! Side effects on the device (writing block devices, deleting ROM files)
//! are reached through the traits defined here and implemented in
//! [`crate::infra`].
//!
//! # Submodules
//!
//! - [`device`] - Device catalog parsing and hardware matching
//! - [`switch`] - ROM switch orchestration
//! - [`wipe`] - Wipe dispatch
//! - [`template`] - AROMA config templating
//! - [`installer`] - AROMA installer archive generation
//! - [`roms`] - Installed ROM discovery
//! - [`layout`] - Partition mount point detection
//! - [`settings`] - Runtime settings
//! - [`version`] - Version string

pub mod device;
pub mod installer;
pub mod layout;
pub mod roms;
pub mod settings;
pub mod switch;
pub mod template;
pub mod version;
pub mod wipe;
