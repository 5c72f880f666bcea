//! Parser for Java-style `.properties` text.
//!
//! Supports `#`/`!` comments, `=`, `:` or whitespace separators, backslash
//! line continuations and the standard escapes (`\t`, `\n`, `\r`, `\f`,
//! `\uXXXX`).

use crate::domain::OverrideSet;
use std::str::Chars;
use thiserror::Error;

const WHITESPACE: &[char] = &[' ', '\t', '\x0c'];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct PropertiesError {
    pub line: usize,
    pub message: String,
}

/// Parse properties text into an override set.
///
/// A key that appears more than once keeps its last value.
pub fn parse_properties(text: &str) -> Result<OverrideSet, PropertiesError> {
    let mut overrides = OverrideSet::new();
    let mut lines = text.lines().enumerate();

    while let Some((idx, raw)) = lines.next() {
        let trimmed = raw.trim_start_matches(WHITESPACE);
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        let line_no = idx + 1;
        let mut logical = trimmed.to_string();
        while has_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start_matches(WHITESPACE)),
                None => break,
            }
        }

        let (key, value) = split_key_value(&logical);
        overrides.insert(unescape(key, line_no)?, unescape(value, line_no)?);
    }

    Ok(overrides)
}

/// An odd number of trailing backslashes joins the next line.
fn has_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Split a logical line at the first unescaped `=`, `:` or whitespace.
fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (idx, c) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || WHITESPACE.contains(&c) {
            key_end = idx;
            break;
        }
    }

    let key = &line[..key_end];
    let mut rest = line[key_end..].trim_start_matches(WHITESPACE);
    if let Some(after_sep) = rest.strip_prefix(['=', ':']) {
        rest = after_sep.trim_start_matches(WHITESPACE);
    }
    (key, rest)
}

fn unescape(raw: &str, line: usize) -> Result<String, PropertiesError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => out.push(unicode_escape(&mut chars, line)?),
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

/// Decode the hex digits after `\u`, pairing UTF-16 surrogates.
fn unicode_escape(chars: &mut Chars<'_>, line: usize) -> Result<char, PropertiesError> {
    let high = read_hex4(chars, line)?;
    if !(0xD800..=0xDBFF).contains(&high) {
        return char::from_u32(high).ok_or_else(|| invalid_escape(line, high));
    }

    if chars.next() != Some('\\') || chars.next() != Some('u') {
        return Err(invalid_escape(line, high));
    }
    let low = read_hex4(chars, line)?;
    if !(0xDC00..=0xDFFF).contains(&low) {
        return Err(invalid_escape(line, low));
    }
    let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
    char::from_u32(code).ok_or_else(|| invalid_escape(line, code))
}

fn read_hex4(chars: &mut Chars<'_>, line: usize) -> Result<u32, PropertiesError> {
    let digits: String = chars.by_ref().take(4).collect();
    if digits.chars().count() != 4 {
        return Err(PropertiesError {
            line,
            message: format!("truncated \\u escape '\\u{digits}'"),
        });
    }
    u32::from_str_radix(&digits, 16).map_err(|_| PropertiesError {
        line,
        message: format!("invalid \\u escape '\\u{digits}'"),
    })
}

fn invalid_escape(line: usize, code: u32) -> PropertiesError {
    PropertiesError { line, message: format!("invalid unicode code point U+{code:04X}") }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(text: &str) -> Vec<(String, String)> {
        parse_properties(text)
            .expect("parse")
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn test_separators() {
        let parsed = entries("a=1\nb = 2\nc:3\nd : 4\ne 5\nf\t=\t6\n");
        assert_eq!(
            parsed,
            vec![
                pair("a", "1"),
                pair("b", "2"),
                pair("c", "3"),
                pair("d", "4"),
                pair("e", "5"),
                pair("f", "6")
            ]
        );
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let parsed = entries("# comment\n   ! bang comment\n\n   \nkey=value\n");
        assert_eq!(parsed, vec![pair("key", "value")]);
    }

    #[test]
    fn test_value_keeps_later_separators_and_trailing_space() {
        let parsed = entries("url=http://host:8090/path?a=b \n");
        assert_eq!(parsed, vec![pair("url", "http://host:8090/path?a=b ")]);
    }

    #[test]
    fn test_key_only_line_has_empty_value() {
        assert_eq!(entries("lonely\n"), vec![pair("lonely", "")]);
    }

    #[test]
    fn test_line_continuation() {
        let parsed = entries("list=a,\\\n    b,\\\n    c\nnext=1\n");
        assert_eq!(parsed, vec![pair("list", "a,b,c"), pair("next", "1")]);
    }

    #[test]
    fn test_even_backslashes_do_not_continue() {
        let parsed = entries("path=C:\\\\\nnext=1\n");
        assert_eq!(parsed, vec![pair("path", "C:\\"), pair("next", "1")]);
    }

    #[test]
    fn test_escapes() {
        let parsed = entries("my\\ key=tab\\there\\u00e9\\uD83D\\uDE80\n");
        assert_eq!(parsed, vec![pair("my key", "tab\there\u{e9}\u{1F680}")]);
    }

    #[test]
    fn test_escaped_separator_in_key() {
        assert_eq!(entries("a\\=b=c\n"), vec![pair("a=b", "c")]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let parsed = entries("a=1\r\nb=2\r\n");
        assert_eq!(parsed, vec![pair("a", "1"), pair("b", "2")]);
    }

    #[test]
    fn test_duplicate_key_last_value_wins() {
        assert_eq!(entries("a=1\na=2\n"), vec![pair("a", "2")]);
    }

    #[test]
    fn test_invalid_unicode_escape_reports_line() {
        let err = parse_properties("ok=1\nbad=\\u12G4\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("invalid"), "unexpected message: {}", err.message);
    }

    #[test]
    fn test_truncated_unicode_escape() {
        let err = parse_properties("bad=\\u12\n").unwrap_err();
        assert_eq!(err.line, 1);
        assert!(err.message.contains("truncated"));
    }

    #[test]
    fn test_unpaired_surrogate_rejected() {
        assert!(parse_properties("bad=\\uD83Dx\n").is_err());
    }
}
