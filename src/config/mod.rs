//! Configuration constants
//!
//! Runtime settings loaded from disk live in [`crate::core::settings`].

pub mod defaults;
