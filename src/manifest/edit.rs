// src/manifest/edit.rs

//! In-place editing of a manifest.
//!
//! Edits only touch the lines they add or remove. Everything else keeps its
//! original bytes, so hand-written formatting survives `add` and `remove`.

use tracing::{debug, info};

use super::parser::validate_package_name;
use super::{EditError, Line, LineEnding, LineKind, Manifest, PackageEntry, COMMENT_MARKER};

impl Manifest {
    /// Add a package, optionally under a group header
    ///
    /// - Existing group with packages: inserted after its last package.
    /// - Existing header without packages: inserted right after the header.
    /// - Unknown group: a new `# group` section is appended.
    /// - No group: inserted after the last package of the file.
    pub fn add(&mut self, name: &str, group: Option<&str>) -> Result<(), EditError> {
        validate_package_name(name).map_err(|reason| EditError::InvalidName {
            name: name.to_string(),
            reason,
        })?;

        if self.contains(name) {
            return Err(EditError::DuplicatePackage(name.to_string()));
        }

        let group = group.map(normalize_group).transpose()?;

        match group {
            Some(label) => {
                let position = self
                    .last_package_index(|e| e.group.as_deref() == Some(label))
                    .or_else(|| self.last_header_index(label));

                match position {
                    Some(idx) => self.insert_line(idx + 1, package_line(name)),
                    None => {
                        debug!("Creating new group '{}'", label);
                        if self
                            .lines
                            .last()
                            .is_some_and(|l| *l.kind() != LineKind::Blank)
                        {
                            self.push_line(String::new(), LineKind::Blank);
                        }
                        self.push_line(
                            format!("{} {}", COMMENT_MARKER, label),
                            LineKind::Header(label.to_string()),
                        );
                        let (content, kind) = package_line(name);
                        self.push_line(content, kind);
                    }
                }
            }
            None => match self.last_package_index(|_| true) {
                Some(idx) => self.insert_line(idx + 1, package_line(name)),
                None => {
                    let (content, kind) = package_line(name);
                    self.push_line(content, kind);
                }
            },
        }

        self.regroup();
        info!("Added package '{}'", name);
        Ok(())
    }

    /// Remove a package, returning its entry if it was listed
    pub fn remove(&mut self, name: &str) -> Option<PackageEntry> {
        let idx = self
            .lines
            .iter()
            .position(|l| l.entry().is_some_and(|e| e.name == name))?;

        let removed = self.lines.remove(idx);

        info!("Removed package '{}'", name);
        match removed.kind {
            LineKind::Package { entry, .. } => Some(entry),
            _ => None,
        }
    }

    /// Terminator used for new lines: CRLF if the file uses it anywhere
    fn dominant_ending(&self) -> LineEnding {
        if self.lines.iter().any(|l| l.ending() == LineEnding::CrLf) {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        }
    }

    fn last_package_index(&self, pred: impl Fn(&PackageEntry) -> bool) -> Option<usize> {
        self.lines
            .iter()
            .rposition(|l| l.entry().is_some_and(&pred))
    }

    fn last_header_index(&self, label: &str) -> Option<usize> {
        self.lines
            .iter()
            .rposition(|l| matches!(l.kind(), LineKind::Header(h) if h == label))
    }

    fn push_line(&mut self, content: String, kind: LineKind) {
        let at = self.lines.len();
        self.insert_line(at, (content, kind));
    }

    /// Insert a line at `at`
    ///
    /// Appending after an unterminated final line terminates it and leaves
    /// the new final line unterminated instead.
    fn insert_line(&mut self, at: usize, (content, kind): (String, LineKind)) {
        let ending = self.dominant_ending();
        let mut new_ending = ending;

        if let Some(prev) = at.checked_sub(1).and_then(|i| self.lines.get_mut(i)) {
            if prev.ending == LineEnding::None {
                prev.ending = ending;
                new_ending = LineEnding::None;
            }
        }

        self.lines.insert(at, Line::new(content, new_ending, kind));
    }

    /// Re-derive every entry's group from the headers above it
    fn regroup(&mut self) {
        let mut group: Option<String> = None;
        for line in &mut self.lines {
            match &mut line.kind {
                LineKind::Header(label) => group = Some(label.clone()),
                LineKind::Package { entry, .. } => entry.group = group.clone(),
                _ => {}
            }
        }
    }
}

fn package_line(name: &str) -> (String, LineKind) {
    (
        name.to_string(),
        LineKind::Package {
            entry: PackageEntry::new(None, name),
            comment: None,
        },
    )
}

/// Trim a group label and check it parses back as a header
fn normalize_group(label: &str) -> Result<&str, EditError> {
    let trimmed = label.trim().trim_start_matches(COMMENT_MARKER).trim();
    if trimmed.contains(['\n', '\r']) || !trimmed.chars().any(char::is_alphanumeric) {
        return Err(EditError::InvalidGroup(label.to_string()));
    }
    Ok(trimmed)
}
