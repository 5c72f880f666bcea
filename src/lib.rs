//! update-package: bulk-update agent configuration files
//!
//! Scans an installation tree for `controller-info.xml` descriptors and
//! `analytics-agent.properties` files and sets the values listed in an
//! override properties file, rewriting only what differs.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod scan;
pub mod update;
pub mod utils;

pub use error::UpdateError;
