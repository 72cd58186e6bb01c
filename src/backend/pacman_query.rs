// src/backend/pacman_query.rs

//! Query installed pacman packages from the system database
//!
//! Uses the `pacman` command-line tool for Arch Linux systems.

use std::collections::HashSet;
use std::process::Command;
use tracing::debug;

use crate::error::{Error, Result};

/// List all installed package names
pub fn list_installed_packages() -> Result<HashSet<String>> {
    debug!("Querying installed pacman packages");

    let output = Command::new("pacman")
        .args(["-Qq"])
        .output()
        .map_err(|e| {
            Error::QueryFailed(format!("Failed to run pacman: {}. Is pacman installed?", e))
        })?;

    if !output.status.success() {
        return Err(Error::QueryFailed(format!(
            "pacman -Qq failed: {}",
            String::from_utf8_lossy(&output.stderr)
        )));
    }

    let packages = parse_query_output(&String::from_utf8_lossy(&output.stdout));
    debug!("Found {} installed packages", packages.len());
    Ok(packages)
}

/// Parse `pacman -Qq` output, one name per line
pub(crate) fn parse_query_output(stdout: &str) -> HashSet<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_output() {
        let packages = parse_query_output("tesseract\ntesseract-data-eng\n\npoppler\n");
        assert_eq!(packages.len(), 3);
        assert!(packages.contains("tesseract-data-eng"));
    }
}
