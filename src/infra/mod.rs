//! Infrastructure layer
//!
//! Handles filesystem access, system properties and the switch and wipe
//! primitives that modify the device.

pub mod filesystem;
pub mod props;
pub mod switcher;
pub mod walk;
pub mod wiper;
