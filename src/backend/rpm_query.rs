// src/backend/rpm_query.rs

//! Query installed RPM packages from the system database
//!
//! Uses the `rpm` command-line tool.

use std::collections::HashSet;
use std::process::Command;
use tracing::debug;

use crate::error::{Error, Result};

/// Output format: `NAME` and `NAME.ARCH`, tab separated
const QUERY_FORMAT: &str = "%{NAME}\t%{NAME}.%{ARCH}\n";

/// List all installed package names, plain and arch-qualified
pub fn list_installed_packages() -> Result<HashSet<String>> {
    debug!("Querying installed RPM packages");

    let output = Command::new("rpm")
        .args(["-qa", "--qf", QUERY_FORMAT])
        .output()
        .map_err(|e| Error::QueryFailed(format!("Failed to run rpm: {}. Is rpm installed?", e)))?;

    if !output.status.success() {
        return Err(Error::QueryFailed(format!(
            "rpm -qa failed: {}",
            String::from_utf8_lossy(&output.stderr)
        )));
    }

    let packages = parse_query_output(&String::from_utf8_lossy(&output.stdout));
    debug!("Found {} installed package names", packages.len());
    Ok(packages)
}

/// Parse `rpm -qa` output in [`QUERY_FORMAT`]
pub(crate) fn parse_query_output(stdout: &str) -> HashSet<String> {
    stdout
        .lines()
        .flat_map(|line| line.split('\t'))
        .map(str::trim)
        // gpg-pubkey entries have no arch and render as "(none)"
        .filter(|name| !name.is_empty() && !name.ends_with(".(none)"))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_output() {
        let stdout = "\
tesseract\ttesseract.x86_64
glibc\tglibc.i686
gpg-pubkey\tgpg-pubkey.(none)
";
        let packages = parse_query_output(stdout);
        assert!(packages.contains("tesseract"));
        assert!(packages.contains("tesseract.x86_64"));
        assert!(packages.contains("glibc.i686"));
        assert!(packages.contains("gpg-pubkey"));
        assert!(!packages.contains("gpg-pubkey.(none)"));
        assert_eq!(packages.len(), 5);
    }
}
