//! Error types for loading overrides and updating target files.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal conditions raised while loading overrides or updating a package.
///
/// Argument errors never reach this type: `clap` reports them with usage
/// text and exit status 2 before any work starts.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// The override input file is missing or unreadable.
    #[error("Cannot read input file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The override input file is not valid properties text.
    #[error("Cannot parse input file {path} (line {line}): {message}")]
    ConfigParse { path: PathBuf, line: usize, message: String },

    /// The package root does not exist or is not a directory.
    #[error("Not a directory: {0}")]
    InvalidDirectory(PathBuf),

    /// An XML target is not well-formed.
    #[error("Malformed XML in {path} at byte {position}: {message}")]
    MalformedDocument { path: PathBuf, position: u64, message: String },

    /// A target file could not be read or written.
    #[error("Cannot access {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl UpdateError {
    pub(crate) fn file_access(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileAccess { path: path.into(), source }
    }
}

pub type Result<T, E = UpdateError> = std::result::Result<T, E>;
