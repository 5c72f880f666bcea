//! update-package: bulk-update agent configuration files
//!
//! Applies the values from an override properties file to every
//! `controller-info.xml` and `analytics-agent.properties` under a package root.

use anyhow::Result;

fn main() -> Result<()> {
    update_package::cli::run()
}
