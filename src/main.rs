//! mbutils - Multiboot utilities
//!
//! Entry point for the mbutils command-line application.

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use mbutils::cli::Cli;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli.validate() {
        tracing::error!("{}", e);
        let _ = Cli::command().write_help(&mut std::io::stderr());
        std::process::exit(1);
    }

    if let Err(e) = cli.run() {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}
