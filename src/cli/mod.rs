//! Command-line interface module
//!
//! This module handles argument parsing and dispatch.
//! It contains no business logic - that belongs in the [`crate::core`] module.

pub mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::core::settings::Settings;
use crate::error::{UsageError, UtilitiesError};
use commands::Commands;

/// Multiboot utilities
///
/// Switch and wipe installed ROMs and generate the AROMA installer.
#[derive(Parser, Debug)]
#[command(name = "mbutils")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Force (only for 'switch' action)
    #[arg(short, long, global = true)]
    pub force: bool,

    /// Path to device definitions file
    #[arg(short, long, global = true, value_name = "PATH")]
    pub devices: Option<PathBuf>,

    /// Path to settings file
    #[arg(short, long, global = true, env = "MBUTILS_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Reject flag combinations clap cannot express
    pub fn validate(&self) -> Result<(), UsageError> {
        let Some(command) = &self.command else {
            return Err(UsageError::MissingAction);
        };

        if self.force && !matches!(command, Commands::Switch { .. }) {
            return Err(UsageError::ForceNotAllowed {
                action: command.name().to_string(),
            });
        }

        Ok(())
    }

    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        self.validate().map_err(UtilitiesError::from)?;
        let Some(command) = self.command else {
            return Err(UtilitiesError::from(UsageError::MissingAction).into());
        };

        let settings = Settings::load(self.config.as_deref())
            .map_err(UtilitiesError::from)?
            .with_devices_file(self.devices);
        tracing::debug!("Settings: {:?}", settings);

        command.run(&settings, self.force)
    }
}
