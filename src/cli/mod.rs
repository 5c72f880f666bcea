//! Command-line interface for update-package
//!
//! Parses the invocation, sets up logging and hands a [`RunConfig`] to the
//! run controller in [`apply`].

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{RunConfig, DEFAULT_INPUT_FILE};

pub mod apply;
mod report;

pub use apply::{RunSummary, Stage};

/// Update controller-info.xml and analytics-agent.properties files for
/// installed agents using values from a properties file
#[derive(Parser, Debug)]
#[command(name = "update-package")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Root directory of the agent package(s) to update
    #[arg(value_name = "PACKAGE_PATH")]
    pub package_path: PathBuf,

    /// Simulate the update without saving the result to disk
    #[arg(short, long)]
    pub simulate: bool,

    /// [path/]name of the input file with the desired values
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_INPUT_FILE)]
    pub input: PathBuf,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn run_config(&self) -> RunConfig {
        RunConfig::new(&self.package_path).input_path(&self.input).simulate(self.simulate)
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    apply::run(&cli.run_config())?;
    Ok(())
}
