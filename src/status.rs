// src/status.rs

//! Comparison of a manifest against installed packages.
//!
//! Answers the question "is this host ready?": every manifest package is
//! either installed or missing. Names match exactly, so an arch-qualified
//! entry (`libc6:i386`, `glibc.i686`) only matches that architecture.

use serde::Serialize;
use std::collections::HashSet;

use crate::manifest::{Manifest, PackageEntry};

/// Install state of one manifest package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryStatus {
    #[serde(flatten)]
    pub entry: PackageEntry,
    pub installed: bool,
}

/// Install state of every manifest package, in manifest order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub entries: Vec<EntryStatus>,
}

impl StatusReport {
    /// Packages that are not installed
    pub fn missing(&self) -> Vec<&PackageEntry> {
        self.entries
            .iter()
            .filter(|s| !s.installed)
            .map(|s| &s.entry)
            .collect()
    }

    /// Packages that are installed
    pub fn installed(&self) -> Vec<&PackageEntry> {
        self.entries
            .iter()
            .filter(|s| s.installed)
            .map(|s| &s.entry)
            .collect()
    }

    /// True when nothing is missing
    pub fn is_satisfied(&self) -> bool {
        self.entries.iter().all(|s| s.installed)
    }
}

/// Compute which manifest packages are installed
pub fn compute_status(manifest: &Manifest, installed: &HashSet<String>) -> StatusReport {
    let entries = manifest
        .entries()
        .map(|entry| EntryStatus {
            installed: installed.contains(&entry.name),
            entry: entry.clone(),
        })
        .collect();

    StatusReport { entries }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn installed(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_compute_status() {
        let manifest = Manifest::parse(
            "# Tesseract OCR and language dependencies\ntesseract-ocr\ntesseract-ocr-ara\n\n# Utility libraries\npoppler-utils\n",
        )
        .unwrap();

        let report = compute_status(&manifest, &installed(&["tesseract-ocr", "poppler-utils", "bash"]));

        assert!(!report.is_satisfied());
        let missing: Vec<_> = report.missing().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(missing, vec!["tesseract-ocr-ara"]);
        assert_eq!(report.installed().len(), 2);
        assert_eq!(report.entries[2].entry.group.as_deref(), Some("Utility libraries"));
    }

    #[test]
    fn test_arch_qualified_names_match_exactly() {
        let manifest = Manifest::parse("# Multiarch\nlibc6:i386\n").unwrap();

        assert!(!compute_status(&manifest, &installed(&["libc6"])).is_satisfied());
        assert!(compute_status(&manifest, &installed(&["libc6:i386"])).is_satisfied());
    }

    #[test]
    fn test_empty_manifest_is_satisfied() {
        let report = compute_status(&Manifest::new(), &HashSet::new());
        assert!(report.is_satisfied());
        assert!(report.entries.is_empty());
    }

    #[test]
    fn test_serialize() {
        let manifest = Manifest::parse("# Tools\njq\n").unwrap();
        let report = compute_status(&manifest, &HashSet::new());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "entries": [{ "group": "Tools", "name": "jq", "installed": false }]
            })
        );
    }
}
