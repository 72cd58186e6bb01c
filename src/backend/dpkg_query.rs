// src/backend/dpkg_query.rs

//! Query installed dpkg packages from the system database
//!
//! Uses the `dpkg-query` command-line tool. Only packages whose status is
//! `installed` count; removed packages with leftover config files do not.

use std::collections::HashSet;
use std::process::Command;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Output format: `binary:Package`, `Package`, `db:Status-Status`
const QUERY_FORMAT: &str = "${binary:Package}\t${Package}\t${db:Status-Status}\n";

/// List all installed package names
///
/// Multi-arch packages appear both qualified (`libc6:i386`) and plain.
pub fn list_installed_packages() -> Result<HashSet<String>> {
    debug!("Querying installed dpkg packages");

    let output = Command::new("dpkg-query")
        .args(["-W", "-f", QUERY_FORMAT])
        .output()
        .map_err(|e| {
            Error::QueryFailed(format!("Failed to run dpkg-query: {}. Is dpkg installed?", e))
        })?;

    if !output.status.success() {
        return Err(Error::QueryFailed(format!(
            "dpkg-query failed: {}",
            String::from_utf8_lossy(&output.stderr)
        )));
    }

    let packages = parse_query_output(&String::from_utf8_lossy(&output.stdout));
    debug!("Found {} installed package names", packages.len());
    Ok(packages)
}

/// Parse `dpkg-query` output in [`QUERY_FORMAT`]
pub(crate) fn parse_query_output(stdout: &str) -> HashSet<String> {
    let mut packages = HashSet::new();

    for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
        let parts: Vec<&str> = line.split('\t').collect();
        if parts.len() < 3 {
            warn!("Skipping malformed dpkg-query line: {}", line);
            continue;
        }

        if parts[2].trim() != "installed" {
            continue;
        }

        for name in &parts[..2] {
            let name = name.trim();
            if !name.is_empty() {
                packages.insert(name.to_string());
            }
        }
    }

    packages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_output() {
        let stdout = "\
libc6:amd64\tlibc6\tinstalled
tesseract-ocr\ttesseract-ocr\tinstalled
poppler-utils\tpoppler-utils\tconfig-files
garbage line
";
        let packages = parse_query_output(stdout);
        assert!(packages.contains("libc6"));
        assert!(packages.contains("libc6:amd64"));
        assert!(packages.contains("tesseract-ocr"));
        assert!(!packages.contains("poppler-utils"));
        assert_eq!(packages.len(), 3);
    }

    #[test]
    fn test_parse_empty_output() {
        assert!(parse_query_output("").is_empty());
    }
}
