// src/manifest/mod.rs

//! Dependency Manifest - declarative list of system packages
//!
//! A manifest is a plain-text file naming the operating-system packages an
//! application needs before it can run. Packages are listed one per line and
//! grouped under `#` comment headers; blank lines separate groups.
//!
//! # Example packages.txt
//!
//! ```text
//! # Graphics libraries
//! libgl1
//! libglib2.0-0
//!
//! # Tesseract OCR and language dependencies
//! tesseract-ocr
//! tesseract-ocr-eng
//!
//! # Utility libraries
//! poppler-utils   # pdftotext, pdftoppm
//! ```
//!
//! The parsed [`Manifest`] keeps every physical line, so rendering it back
//! reproduces the original bytes exactly. Package entries carry the label of
//! the nearest preceding header as their group.

mod edit;
pub mod lint;
pub mod parser;
pub mod render;

pub use lint::{lint, Diagnostic, DiagnosticKind, LintReport, Severity};
pub use parser::{parse_manifest, parse_manifest_file, validate_package_name};
pub use render::render;

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

/// Marker that starts a comment or group header
pub const COMMENT_MARKER: char = '#';

/// A package declared by the manifest
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageEntry {
    /// Label of the nearest preceding group header, if any
    pub group: Option<String>,
    /// Package identifier as understood by the system package manager
    pub name: String,
}

impl PackageEntry {
    pub fn new(group: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            group: group.map(str::to_string),
            name: name.into(),
        }
    }
}

/// Terminator that ended a physical line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
    /// Final line of a file without a trailing newline
    None,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
            LineEnding::None => "",
        }
    }
}

/// Classification of a manifest line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Empty or whitespace-only separator
    Blank,
    /// Comment whose text names a group
    Header(String),
    /// Comment without any alphanumeric text (`#`, `# -----`)
    Comment,
    /// A package name, optionally followed by an inline comment
    Package {
        entry: PackageEntry,
        comment: Option<String>,
    },
}

/// One physical line of a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    content: String,
    ending: LineEnding,
    kind: LineKind,
}

impl Line {
    pub(crate) fn new(content: impl Into<String>, ending: LineEnding, kind: LineKind) -> Self {
        Self {
            content: content.into(),
            ending,
            kind,
        }
    }

    /// Line text without its terminator, exactly as written
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn ending(&self) -> LineEnding {
        self.ending
    }

    pub fn kind(&self) -> &LineKind {
        &self.kind
    }

    /// The package entry on this line, if it is a package line
    pub fn entry(&self) -> Option<&PackageEntry> {
        match &self.kind {
            LineKind::Package { entry, .. } => Some(entry),
            _ => None,
        }
    }
}

/// A group of packages sharing a header label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    /// Header label; `None` for packages listed before any header
    pub label: Option<String>,
    pub packages: Vec<String>,
}

/// Reason a line is not a valid package token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MalformedReason {
    #[error("expected a single package name")]
    MultipleTokens,

    #[error("package name must start with a letter or digit")]
    InvalidStart,

    #[error("invalid character {0:?} in package name")]
    InvalidCharacter(char),
}

/// Errors that can occur when parsing a manifest
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: malformed line {content:?}: {reason}")]
    MalformedLine {
        line: usize,
        content: String,
        reason: MalformedReason,
    },

    #[error("line {line}: duplicate package '{name}' (first listed on line {first_line})")]
    DuplicatePackage {
        name: String,
        line: usize,
        first_line: usize,
    },
}

impl ParseError {
    /// 1-based line number the error was reported on
    pub fn line(&self) -> usize {
        match self {
            ParseError::MalformedLine { line, .. } => *line,
            ParseError::DuplicatePackage { line, .. } => *line,
        }
    }
}

/// Errors that can occur when editing a manifest
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("invalid package name {name:?}: {reason}")]
    InvalidName {
        name: String,
        reason: MalformedReason,
    },

    #[error("package '{0}' is already listed")]
    DuplicatePackage(String),

    #[error("invalid group label {0:?}")]
    InvalidGroup(String),
}

/// A parsed dependency manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    lines: Vec<Line>,
}

impl Manifest {
    /// Create an empty manifest
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_lines(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    /// Parse manifest text
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        parse_manifest(text)
    }

    /// All physical lines in file order
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Package entries in file order
    pub fn entries(&self) -> impl Iterator<Item = &PackageEntry> {
        self.lines.iter().filter_map(Line::entry)
    }

    /// Package names in file order
    pub fn names(&self) -> Vec<&str> {
        self.entries().map(|e| e.name.as_str()).collect()
    }

    /// Look up a package entry by name
    pub fn get(&self, name: &str) -> Option<&PackageEntry> {
        self.entries().find(|e| e.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of package entries
    pub fn len(&self) -> usize {
        self.entries().count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }

    /// Packages whose group label equals `label`
    pub fn entries_in_group<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a PackageEntry> {
        self.entries()
            .filter(move |e| e.group.as_deref() == Some(label))
    }

    /// Groups in order of first appearance
    ///
    /// Headers that reappear later in the file merge into their first
    /// occurrence. Headers with no packages are listed with an empty package
    /// list.
    pub fn groups(&self) -> Vec<Group> {
        let mut groups: Vec<Group> = Vec::new();

        for line in &self.lines {
            let (label, package) = match &line.kind {
                LineKind::Header(label) => (Some(label), None),
                LineKind::Package { entry, .. } => (entry.group.as_ref(), Some(&entry.name)),
                _ => continue,
            };

            let idx = match groups.iter().position(|g| g.label.as_ref() == label) {
                Some(idx) => idx,
                None => {
                    groups.push(Group {
                        label: label.cloned(),
                        packages: Vec::new(),
                    });
                    groups.len() - 1
                }
            };

            if let Some(name) = package {
                groups[idx].packages.push(name.clone());
            }
        }

        groups
    }

    /// Write the rendered manifest to a file
    pub fn write_to(&self, path: &Path) -> crate::Result<()> {
        std::fs::write(path, self.render())?;
        info!("Wrote manifest with {} package(s) to {}", self.len(), path.display());
        Ok(())
    }
}

impl FromStr for Manifest {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_manifest(s)
    }
}
