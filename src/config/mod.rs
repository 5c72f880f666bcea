//! Run configuration and override loading
//!
//! The run configuration is built once from the command line and passed by
//! reference into every stage; the override set is loaded from a
//! properties file named by that configuration.

pub mod loader;
pub mod properties;

pub use loader::load_overrides;
pub use properties::{parse_properties, PropertiesError};

use std::path::PathBuf;

/// Input file used when `--input` is not given, resolved against the
/// current directory.
pub const DEFAULT_INPUT_FILE: &str = "update-package.properties";

/// Settings for a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Root directory scanned for target files.
    pub package_path: PathBuf,
    /// Properties file holding the desired values.
    pub input_path: PathBuf,
    /// Report changes without writing any file.
    pub simulate: bool,
}

impl RunConfig {
    pub fn new(package_path: impl Into<PathBuf>) -> Self {
        Self {
            package_path: package_path.into(),
            input_path: PathBuf::from(DEFAULT_INPUT_FILE),
            simulate: false,
        }
    }

    pub fn input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = path.into();
        self
    }

    pub fn simulate(mut self, simulate: bool) -> Self {
        self.simulate = simulate;
        self
    }
}
