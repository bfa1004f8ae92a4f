//! mbutils - Multiboot utilities
//!
//! Device detection, ROM switching, ROM wiping and AROMA installer
//! generation for a multiboot Android setup.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and dispatch
//! - [`core`] - Business logic
//! - [`infra`] - Infrastructure layer (filesystem, properties, block devices)
//! - [`config`] - Constants and defaults
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
