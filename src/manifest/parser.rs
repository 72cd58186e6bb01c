// src/manifest/parser.rs

//! Parser for plain-text package manifests.

use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use super::{
    Line, LineEnding, LineKind, MalformedReason, Manifest, PackageEntry, ParseError,
    COMMENT_MARKER,
};

/// UTF-8 byte-order mark some editors write at the start of a file
pub(crate) const BYTE_ORDER_MARK: char = '\u{feff}';

/// A physical line before classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawLine<'a> {
    /// 1-based line number
    pub number: usize,
    pub content: &'a str,
    pub ending: LineEnding,
}

/// Split text into lines, remembering each line's terminator
pub(crate) fn split_lines(text: &str) -> Vec<RawLine<'_>> {
    text.split_inclusive('\n')
        .enumerate()
        .map(|(idx, chunk)| {
            let (content, ending) = if let Some(rest) = chunk.strip_suffix("\r\n") {
                (rest, LineEnding::CrLf)
            } else if let Some(rest) = chunk.strip_suffix('\n') {
                (rest, LineEnding::Lf)
            } else {
                (chunk, LineEnding::None)
            };
            RawLine {
                number: idx + 1,
                content,
                ending,
            }
        })
        .collect()
}

/// Line classification borrowing from the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Classified<'a> {
    Blank,
    Header(&'a str),
    Comment,
    Package {
        name: &'a str,
        comment: Option<&'a str>,
    },
}

/// Classify a single line (without its terminator)
pub(crate) fn classify_line(content: &str) -> Result<Classified<'_>, MalformedReason> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Ok(Classified::Blank);
    }

    if trimmed.starts_with(COMMENT_MARKER) {
        let text = comment_text(trimmed);
        if text.chars().any(char::is_alphanumeric) {
            return Ok(Classified::Header(text));
        }
        return Ok(Classified::Comment);
    }

    let (body, comment) = split_inline_comment(trimmed);
    let name = body.trim();
    if name.contains(char::is_whitespace) {
        return Err(MalformedReason::MultipleTokens);
    }
    validate_package_name(name)?;

    Ok(Classified::Package { name, comment })
}

/// Text of a comment line with the marker run and surrounding whitespace removed
fn comment_text(trimmed: &str) -> &str {
    trimmed.trim_start_matches(COMMENT_MARKER).trim()
}

/// Split `name   # note` into the name part and the note
///
/// Only a marker preceded by whitespace starts an inline comment.
fn split_inline_comment(trimmed: &str) -> (&str, Option<&str>) {
    let mut prev_is_space = false;
    for (idx, c) in trimmed.char_indices() {
        if c == COMMENT_MARKER && prev_is_space {
            return (&trimmed[..idx], Some(comment_text(&trimmed[idx..])));
        }
        prev_is_space = c.is_whitespace();
    }
    (trimmed, None)
}

/// Check that `name` is a single valid package token
///
/// Names start with an ASCII letter or digit and continue with ASCII
/// alphanumerics or `+ - . _ :`. This covers Debian, RPM and Arch names as
/// well as `name:arch` qualifiers.
pub fn validate_package_name(name: &str) -> Result<(), MalformedReason> {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphanumeric() => {}
        _ => return Err(MalformedReason::InvalidStart),
    }

    for c in chars {
        if !(c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.' | '_' | ':')) {
            return Err(MalformedReason::InvalidCharacter(c));
        }
    }

    Ok(())
}

/// Result of a full pass over manifest text
#[derive(Debug, Default)]
pub(crate) struct Scan {
    /// Classified lines; malformed and duplicate lines are left out
    pub lines: Vec<Line>,
    /// Line number of each entry in `lines`
    pub numbers: Vec<usize>,
    /// Every error found, in line order
    pub errors: Vec<ParseError>,
}

/// Classify every line, deriving groups and collecting all errors
pub(crate) fn scan(text: &str) -> Scan {
    let mut result = Scan::default();
    let mut group: Option<String> = None;
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for raw in split_lines(text) {
        // The mark stays in the line content so rendering keeps it
        let content = if raw.number == 1 {
            raw.content.strip_prefix(BYTE_ORDER_MARK).unwrap_or(raw.content)
        } else {
            raw.content
        };

        let kind = match classify_line(content) {
            Ok(Classified::Blank) => LineKind::Blank,
            Ok(Classified::Comment) => LineKind::Comment,
            Ok(Classified::Header(label)) => {
                group = Some(label.to_string());
                LineKind::Header(label.to_string())
            }
            Ok(Classified::Package { name, comment }) => {
                if let Some(&first_line) = seen.get(name) {
                    result.errors.push(ParseError::DuplicatePackage {
                        name: name.to_string(),
                        line: raw.number,
                        first_line,
                    });
                    continue;
                }
                seen.insert(name, raw.number);
                LineKind::Package {
                    entry: PackageEntry {
                        group: group.clone(),
                        name: name.to_string(),
                    },
                    comment: comment.map(str::to_string),
                }
            }
            Err(reason) => {
                result.errors.push(ParseError::MalformedLine {
                    line: raw.number,
                    content: raw.content.to_string(),
                    reason,
                });
                continue;
            }
        };

        result.lines.push(Line::new(raw.content, raw.ending, kind));
        result.numbers.push(raw.number);
    }

    result
}

/// Parse a manifest from text, failing on the first error
pub fn parse_manifest(text: &str) -> Result<Manifest, ParseError> {
    let scan = scan(text);
    if let Some(err) = scan.errors.into_iter().next() {
        return Err(err);
    }

    let manifest = Manifest::from_lines(scan.lines);
    debug!(
        "Parsed manifest: {} line(s), {} package(s)",
        manifest.lines().len(),
        manifest.len()
    );
    Ok(manifest)
}

/// Parse a manifest from a file
pub fn parse_manifest_file(path: &Path) -> crate::Result<Manifest> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_manifest(&content)?)
}
