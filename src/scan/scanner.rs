//! Target file discovery

use crate::domain::{TargetFiles, PROPERTIES_TARGET_SUFFIX, XML_TARGET_SUFFIX};
use crate::error::{Result, UpdateError};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Walks a package root and classifies agent configuration files by name.
pub struct TargetScanner {
    root_path: PathBuf,
}

impl TargetScanner {
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Walk the whole tree and return matching files.
    ///
    /// Directory entries are visited in file name order, so results are
    /// stable across runs. Directory symlinks are not followed; a symlink
    /// to a regular file is a target like the file itself.
    pub fn scan(&self) -> Result<TargetFiles> {
        if !self.root_path.is_dir() {
            return Err(UpdateError::InvalidDirectory(self.root_path.clone()));
        }

        let mut targets = TargetFiles::default();
        let walker = WalkDir::new(&self.root_path).follow_links(false).sort_by_file_name();

        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    tracing::warn!("Skipping unreadable entry: {}", err);
                    continue;
                }
            };

            let file_type = entry.file_type();
            if !(file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())) {
                continue;
            }

            // Names need not be valid UTF-8 to match.
            let name = entry.file_name().as_encoded_bytes();
            if name.ends_with(XML_TARGET_SUFFIX.as_bytes()) {
                targets.xml.push(entry.into_path());
            } else if name.ends_with(PROPERTIES_TARGET_SUFFIX.as_bytes()) {
                targets.properties.push(entry.into_path());
            }
        }

        tracing::debug!(
            root = %self.root_path.display(),
            xml = targets.xml.len(),
            properties = targets.properties.len(),
            "Discovered target files"
        );

        Ok(targets)
    }
}

/// Scan `root` for agent configuration files using the standard names.
pub fn locate_targets(root: &Path) -> Result<TargetFiles> {
    TargetScanner::new(root.to_path_buf()).scan()
}
