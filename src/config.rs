// src/config.rs

//! Tool configuration
//!
//! Settings are read from a TOML file. Lookup order: an explicit path, then
//! the `PKGMANIFEST_CONFIG` environment variable, then
//! `<config dir>/pkgmanifest/config.toml`. Without any file the defaults
//! apply.
//!
//! A relative `manifest` path in a config file is resolved against the
//! directory holding that file. The built-in default `packages.txt` is
//! relative to the current directory.
//!
//! ```toml
//! manifest = "packages.txt"
//! package_manager = "dpkg"
//!
//! [install]
//! sudo = false
//! assume_yes = true
//! refresh = true
//! extra_args = ["--no-install-recommends"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::backend::SystemPackageManager;
use crate::error::Result;

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "PKGMANIFEST_CONFIG";

/// Manifest path used when neither the CLI nor the config names one
pub const DEFAULT_MANIFEST_PATH: &str = "packages.txt";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Manifest file to operate on; `packages.txt` when unset
    #[serde(default)]
    pub manifest: Option<PathBuf>,

    /// Package manager override; detected from the host when absent
    #[serde(default)]
    pub package_manager: Option<SystemPackageManager>,

    /// Installation behavior
    #[serde(default)]
    pub install: InstallSettings,
}

/// How install commands are built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstallSettings {
    /// Prefix commands with `sudo`
    pub sudo: bool,
    /// Answer yes to package manager prompts
    pub assume_yes: bool,
    /// Refresh repository metadata before installing; on pacman this makes
    /// the install a full `-Syu`
    pub refresh: bool,
    /// Extra arguments passed to the install command before package names
    pub extra_args: Vec<String>,
}

impl Default for InstallSettings {
    fn default() -> Self {
        Self {
            sudo: false,
            assume_yes: true,
            refresh: true,
            extra_args: Vec::new(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;

        if let Some(manifest) = config.manifest.as_mut() {
            if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                if manifest.is_relative() {
                    *manifest = dir.join(&*manifest);
                }
            }
        }

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load configuration following the lookup order
    ///
    /// An explicit path or `PKGMANIFEST_CONFIG` must exist; the per-user
    /// default location is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::from_file(Path::new(&path));
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Per-user config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pkgmanifest").join("config.toml"))
    }

    /// Manifest path from the config, or `packages.txt`
    pub fn manifest_path(&self) -> PathBuf {
        self.manifest
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST_PATH))
    }

    /// Configured package manager, or the one detected on this host
    pub fn package_manager(&self) -> SystemPackageManager {
        self.package_manager
            .unwrap_or_else(SystemPackageManager::detect)
    }

    /// Serialize the configuration to TOML
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.manifest_path(), PathBuf::from("packages.txt"));
        assert!(config.install.assume_yes);
        assert!(config.install.refresh);
        assert!(!config.install.sudo);
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_toml_str(
            r#"
manifest = "deps/apt.txt"
package_manager = "pacman"

[install]
sudo = true
extra_args = ["--no-install-recommends"]
"#,
        )
        .unwrap();

        assert_eq!(config.manifest, Some(PathBuf::from("deps/apt.txt")));
        assert_eq!(config.package_manager(), SystemPackageManager::Pacman);
        assert!(config.install.sudo);
        assert!(config.install.assume_yes);
        assert_eq!(config.install.extra_args, vec!["--no-install-recommends"]);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(matches!(
            Config::from_toml_str("manifests = \"x\"\n"),
            Err(Error::Config(_))
        ));
        assert!(Config::from_toml_str("[install]\nyes = true\n").is_err());
        assert!(Config::from_toml_str("package_manager = \"apk\"\n").is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "package_manager = \"rpm\"").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.package_manager, Some(SystemPackageManager::Rpm));
    }

    #[test]
    fn test_manifest_relative_to_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "manifest = \"deps/packages.txt\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.manifest_path(), dir.path().join("deps/packages.txt"));

        std::fs::write(&path, "manifest = \"/srv/app/packages.txt\"\n").unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.manifest_path(), PathBuf::from("/srv/app/packages.txt"));

        // Without a manifest key the default stays relative to the working directory
        std::fs::write(&path, "package_manager = \"dpkg\"\n").unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.manifest_path(), PathBuf::from(DEFAULT_MANIFEST_PATH));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let result = Config::load(Some(Path::new("/nonexistent/pkgmanifest.toml")));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let mut config = Config::default();
        config.package_manager = Some(SystemPackageManager::Dpkg);
        config.install.extra_args = vec!["-q".to_string()];

        let toml = config.to_toml().unwrap();
        assert_eq!(Config::from_toml_str(&toml).unwrap(), config);
    }
}
