//! Line-oriented `key=value` updates for properties files.
//!
//! Lines are rewritten textually; nothing is re-serialized, so comments,
//! blank lines, ordering and untouched assignments stay byte-for-byte the
//! same. Only the first assignment of each override key is eligible for
//! replacement.

use crate::domain::{Change, FileUpdate, OverrideSet};
use crate::error::{Result, UpdateError};
use crate::utils::{atomic_write, read_text_file};
use std::collections::HashSet;
use std::path::Path;

/// A `key=value` assignment parsed from one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigLine<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

impl<'a> ConfigLine<'a> {
    /// Parse a line without its terminator.
    ///
    /// Returns `None` for comments (first non-space character is `#`) and
    /// for lines without `=`. The key is the text before the first `=` with
    /// trailing spaces removed; the value is the rest with leading spaces and
    /// trailing whitespace removed.
    pub fn parse(line: &'a str) -> Option<Self> {
        if line.trim_start_matches(' ').starts_with('#') {
            return None;
        }
        let (key, value) = line.split_once('=')?;
        Some(Self {
            key: key.trim_end_matches(' '),
            value: value.trim_start_matches(' ').trim_end(),
        })
    }
}

/// Rewrite properties text, returning the new content and the changes made.
pub fn rewrite_properties(content: &str, overrides: &OverrideSet) -> (String, Vec<Change>) {
    let mut output = String::with_capacity(content.len());
    let mut changes = Vec::new();
    let mut matched: HashSet<&str> = HashSet::new();

    for line in content.split_inclusive('\n') {
        let (body, ending) = split_line_ending(line);

        let replacement = ConfigLine::parse(body).and_then(|config| {
            let desired = overrides.get(config.key)?;
            // Later assignments of an already-seen key are left alone.
            if !matched.insert(config.key) || config.value == desired {
                return None;
            }
            changes.push(Change {
                key: config.key.to_string(),
                old: config.value.to_string(),
                new: desired.to_string(),
            });
            let ending = if ending.is_empty() { "\n" } else { ending };
            Some(format!("{}={}{}", config.key, desired, ending))
        });

        match replacement {
            Some(new_line) => output.push_str(&new_line),
            None => output.push_str(line),
        }
    }

    (output, changes)
}

fn split_line_ending(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

/// Apply overrides to one properties file, writing it back unless simulating.
pub fn update_properties_file(
    path: &Path,
    overrides: &OverrideSet,
    simulate: bool,
) -> Result<FileUpdate> {
    let file = read_text_file(path).map_err(|err| UpdateError::file_access(path, err))?;
    let (content, changes) = rewrite_properties(&file.content, overrides);

    let written = !simulate && !changes.is_empty();
    if written {
        atomic_write(path, &file.encode_or_utf8(&content))
            .map_err(|err| UpdateError::file_access(path, err))?;
    }

    tracing::debug!(
        path = %path.display(),
        changes = changes.len(),
        written,
        "Processed properties file"
    );

    Ok(FileUpdate { path: path.to_path_buf(), changes, written })
}
