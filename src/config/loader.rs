//! Override file loading

use super::properties::parse_properties;
use crate::domain::OverrideSet;
use crate::error::{Result, UpdateError};
use crate::utils::read_text_file;
use std::path::Path;

/// Load the desired key/value overrides from a properties file.
pub fn load_overrides(path: &Path) -> Result<OverrideSet> {
    let text = read_text_file(path)
        .map_err(|source| UpdateError::ConfigRead { path: path.to_path_buf(), source })?;

    let overrides = parse_properties(&text.content).map_err(|err| UpdateError::ConfigParse {
        path: path.to_path_buf(),
        line: err.line,
        message: err.message,
    })?;

    if overrides.is_empty() {
        tracing::warn!("Input file {} defines no overrides", path.display());
    }
    tracing::debug!(
        path = %path.display(),
        encoding = %text.encoding_name(),
        count = overrides.len(),
        "Loaded overrides"
    );

    Ok(overrides)
}
