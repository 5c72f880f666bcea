//! Encoding-aware reading and writing of text files.
//!
//! Agent configuration files are usually UTF-8, but properties files written
//! by Java tooling are frequently ISO-8859-1. Files are decoded as:
//! - UTF-8 (a leading byte-order mark is remembered and stripped)
//! - Windows-1252 when the bytes are not valid UTF-8
//!
//! The detected encoding is kept alongside the text so a rewritten file goes
//! back to disk in the encoding it came from.

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use std::io;
use std::path::Path;

const UTF8_BOM: &[u8] = &[0xef, 0xbb, 0xbf];

/// Decoded file content plus what is needed to encode it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFile {
    pub content: String,
    encoding: &'static Encoding,
    bom: bool,
}

impl TextFile {
    /// Decode raw file bytes.
    pub fn decode(bytes: &[u8]) -> Self {
        let (body, bom) = match bytes.strip_prefix(UTF8_BOM) {
            Some(rest) => (rest, true),
            None => (bytes, false),
        };

        if let Ok(text) = std::str::from_utf8(body) {
            return Self { content: text.to_string(), encoding: UTF_8, bom };
        }

        // Every byte maps to a character in Windows-1252, so this never fails.
        let (decoded, _had_errors) = WINDOWS_1252.decode_without_bom_handling(body);
        Self { content: decoded.into_owned(), encoding: WINDOWS_1252, bom }
    }

    /// Encode `content` the way this file was originally stored.
    ///
    /// Characters the encoding cannot represent become `&#N;` references,
    /// which only XML text reads back as the original character.
    pub fn encode(&self, content: &str) -> Vec<u8> {
        let (encoded, _used, had_unmappable) = self.encoding.encode(content);
        if had_unmappable {
            tracing::warn!(
                "Characters not representable in {} were written as numeric references",
                self.encoding.name()
            );
        }
        self.with_bom(&encoded)
    }

    /// Encode `content` in the original encoding, or as UTF-8 when the
    /// original encoding cannot represent all of it.
    pub fn encode_or_utf8(&self, content: &str) -> Vec<u8> {
        let (encoded, _used, had_unmappable) = self.encoding.encode(content);
        if !had_unmappable {
            return self.with_bom(&encoded);
        }
        tracing::warn!(
            encoding = self.encoding.name(),
            "New content is not representable in the file's encoding, rewriting as UTF-8"
        );
        self.with_bom(content.as_bytes())
    }

    fn with_bom(&self, encoded: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(encoded.len() + UTF8_BOM.len());
        if self.bom {
            out.extend_from_slice(UTF8_BOM);
        }
        out.extend_from_slice(encoded);
        out
    }

    /// Lowercase label of the detected encoding (e.g. "utf-8", "windows-1252").
    pub fn encoding_name(&self) -> String {
        self.encoding.name().to_lowercase()
    }
}

/// Read and decode a text file.
pub fn read_text_file(path: &Path) -> io::Result<TextFile> {
    let bytes = std::fs::read(path)?;
    Ok(TextFile::decode(&bytes))
}
