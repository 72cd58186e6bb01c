// src/lib.rs

//! pkgmanifest - system package manifests
//!
//! A manifest is a plain-text list of operating-system packages, grouped
//! under `#` comment headers, that must be installed before an application
//! can run.
//!
//! # Architecture
//!
//! - Lossless: parsing keeps every line, rendering reproduces the input bytes
//! - Validation: malformed lines and duplicate packages are parse errors
//! - Editing: add/remove packages without reformatting the file
//! - Delegation: installation is handed to dpkg/apt, rpm/dnf or pacman

pub mod backend;
pub mod config;
mod error;
pub mod manifest;
pub mod status;

pub use backend::{InstallCommand, SystemPackageManager};
pub use config::{Config, InstallSettings, DEFAULT_MANIFEST_PATH};
pub use error::{Error, Result};
pub use manifest::{
    lint, parse_manifest, parse_manifest_file, render, EditError, Group, LintReport, Manifest,
    PackageEntry, ParseError,
};
pub use status::{compute_status, EntryStatus, StatusReport};
