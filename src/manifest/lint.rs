// src/manifest/lint.rs

//! Manifest linting.
//!
//! Unlike [`parse_manifest`](super::parse_manifest), which stops at the first
//! error, the linter reports every problem in the file together with style
//! warnings. A report without errors guarantees the text parses.

use serde::Serialize;
use std::fmt;
use strum_macros::Display;

use super::parser::{scan, split_lines};
use super::{LineEnding, LineKind, ParseError};

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// What a diagnostic reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// The line would make parsing fail
    Parse(ParseError),
    /// Package listed before any group header
    UngroupedPackage { name: String },
    /// Line ends with spaces or tabs
    TrailingWhitespace,
    /// Last line has no terminator
    MissingFinalNewline,
    /// Header followed by no packages before the next section or end of file
    EmptyGroup { label: String },
}

/// A single lint finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line number
    pub line: usize,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self.kind {
            DiagnosticKind::Parse(_) => Severity::Error,
            _ => Severity::Warning,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.severity())?;
        match &self.kind {
            // Parse errors carry their own line number
            DiagnosticKind::Parse(err) => write!(f, "{}", err),
            DiagnosticKind::UngroupedPackage { name } => write!(
                f,
                "line {}: package '{}' is not under a group header",
                self.line, name
            ),
            DiagnosticKind::TrailingWhitespace => {
                write!(f, "line {}: trailing whitespace", self.line)
            }
            DiagnosticKind::MissingFinalNewline => {
                write!(f, "line {}: no newline at end of file", self.line)
            }
            DiagnosticKind::EmptyGroup { label } => {
                write!(f, "line {}: group '{}' has no packages", self.line, label)
            }
        }
    }
}

impl Serialize for Diagnostic {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Diagnostic", 3)?;
        state.serialize_field("line", &self.line)?;
        state.serialize_field("severity", &self.severity())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// All findings for a manifest, ordered by line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LintReport {
    pub diagnostics: Vec<Diagnostic>,
}

impl LintReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Lint manifest text
pub fn lint(text: &str) -> LintReport {
    let mut diagnostics = Vec::new();

    let raw_lines = split_lines(text);
    for raw in &raw_lines {
        if raw.content.ends_with([' ', '\t']) {
            diagnostics.push(Diagnostic {
                line: raw.number,
                kind: DiagnosticKind::TrailingWhitespace,
            });
        }
    }
    if let Some(last) = raw_lines.last() {
        if last.ending == LineEnding::None {
            diagnostics.push(Diagnostic {
                line: last.number,
                kind: DiagnosticKind::MissingFinalNewline,
            });
        }
    }

    let scan = scan(text);
    diagnostics.extend(scan.errors.into_iter().map(|err| Diagnostic {
        line: err.line(),
        kind: DiagnosticKind::Parse(err),
    }));

    // Consecutive headers form one block; a block is empty when a blank line
    // and then another header (or the end of file) follow without a package.
    let mut pending: Option<(usize, String)> = None;
    let mut blank_since_header = false;
    for (line, number) in scan.lines.iter().zip(&scan.numbers) {
        match line.kind() {
            LineKind::Blank => blank_since_header = pending.is_some(),
            LineKind::Header(label) => {
                if blank_since_header {
                    if let Some((line, label)) = pending.take() {
                        diagnostics.push(Diagnostic {
                            line,
                            kind: DiagnosticKind::EmptyGroup { label },
                        });
                    }
                }
                pending = Some((*number, label.clone()));
                blank_since_header = false;
            }
            LineKind::Package { entry, .. } => {
                pending = None;
                blank_since_header = false;
                if entry.group.is_none() {
                    diagnostics.push(Diagnostic {
                        line: *number,
                        kind: DiagnosticKind::UngroupedPackage {
                            name: entry.name.clone(),
                        },
                    });
                }
            }
            LineKind::Comment => {}
        }
    }
    if let Some((line, label)) = pending {
        diagnostics.push(Diagnostic {
            line,
            kind: DiagnosticKind::EmptyGroup { label },
        });
    }

    diagnostics.sort_by_key(|d| (d.line, d.severity()));
    LintReport { diagnostics }
}
