// src/backend/mod.rs

//! System package manager integration
//!
//! The manifest only names packages; resolving and installing them is left to
//! the host's package manager. This module detects which one is present,
//! lists what it has installed, and builds the commands that install the
//! packages a manifest declares.

pub mod dpkg_query;
pub mod pacman_query;
pub mod rpm_query;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::process::Command;
use strum_macros::{Display, EnumString};
use tracing::{debug, info};

use crate::config::InstallSettings;
use crate::error::{Error, Result};

/// Package manager families supported on the host
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SystemPackageManager {
    /// Debian/Ubuntu (dpkg database, apt-get front end)
    Dpkg,
    /// Fedora/RHEL (rpm database, dnf front end)
    Rpm,
    /// Arch Linux
    Pacman,
    /// Nothing supported was found
    #[default]
    Unknown,
}

impl SystemPackageManager {
    /// Detect the package manager available on this system
    pub fn detect() -> Self {
        Self::detect_with(|binary| which::which(binary).is_ok())
    }

    /// Detect using a custom presence check, in order dpkg, rpm, pacman
    pub fn detect_with(is_present: impl Fn(&str) -> bool) -> Self {
        let detected = [Self::Dpkg, Self::Rpm, Self::Pacman]
            .into_iter()
            .find(|pm| pm.query_binary().is_some_and(&is_present))
            .unwrap_or(Self::Unknown);

        debug!("Detected package manager: {}", detected);
        detected
    }

    /// Whether this is a supported package manager
    pub fn is_available(self) -> bool {
        self != Self::Unknown
    }

    /// Binary used to query the installed package database
    fn query_binary(self) -> Option<&'static str> {
        match self {
            Self::Dpkg => Some("dpkg-query"),
            Self::Rpm => Some("rpm"),
            Self::Pacman => Some("pacman"),
            Self::Unknown => None,
        }
    }

    /// Names of all packages installed on the system
    pub fn installed_packages(self) -> Result<HashSet<String>> {
        match self {
            Self::Dpkg => dpkg_query::list_installed_packages(),
            Self::Rpm => rpm_query::list_installed_packages(),
            Self::Pacman => pacman_query::list_installed_packages(),
            Self::Unknown => Err(Error::UnsupportedPackageManager),
        }
    }

    /// Build the command that installs `packages`
    pub fn install_command<S: AsRef<str>>(
        self,
        packages: &[S],
        settings: &InstallSettings,
    ) -> Result<InstallCommand> {
        let mut cmd = match self {
            Self::Dpkg => {
                let mut cmd = InstallCommand::new("apt-get").arg("install");
                if settings.assume_yes {
                    cmd = cmd.arg("-y");
                }
                cmd
            }
            Self::Rpm => {
                let mut cmd = InstallCommand::new("dnf").arg("install");
                if settings.assume_yes {
                    cmd = cmd.arg("-y");
                }
                cmd
            }
            Self::Pacman => {
                // Arch does not support syncing the database without
                // upgrading, so a refresh becomes a full -Syu here
                let sync = if settings.refresh { "-Syu" } else { "-S" };
                let mut cmd = InstallCommand::new("pacman").args([sync, "--needed"]);
                if settings.assume_yes {
                    cmd = cmd.arg("--noconfirm");
                }
                cmd
            }
            Self::Unknown => return Err(Error::UnsupportedPackageManager),
        };

        cmd = cmd.args(&settings.extra_args);
        cmd = cmd.args(packages.iter().map(|p| AsRef::<str>::as_ref(p)));

        Ok(if settings.sudo { cmd.with_sudo() } else { cmd })
    }

    /// Build the command that refreshes repository metadata
    ///
    /// Returns `None` for pacman, whose install command syncs and upgrades
    /// in the same transaction.
    pub fn refresh_command(self, settings: &InstallSettings) -> Result<Option<InstallCommand>> {
        let cmd = match self {
            Self::Dpkg => InstallCommand::new("apt-get").arg("update"),
            Self::Rpm => InstallCommand::new("dnf").arg("makecache"),
            Self::Pacman => return Ok(None),
            Self::Unknown => return Err(Error::UnsupportedPackageManager),
        };

        Ok(Some(if settings.sudo { cmd.with_sudo() } else { cmd }))
    }
}

/// An external command to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl InstallCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Prefix the command with `sudo`
    pub fn with_sudo(self) -> Self {
        let mut args = Vec::with_capacity(self.args.len() + 1);
        args.push(self.program);
        args.extend(self.args);
        Self {
            program: "sudo".to_string(),
            args,
        }
    }

    /// Run the command with inherited stdio, failing on non-zero exit
    pub fn run(&self) -> Result<()> {
        info!("Running: {}", self);

        let status = Command::new(&self.program)
            .args(&self.args)
            .status()
            .map_err(|e| Error::CommandFailed {
                command: self.to_string(),
                reason: e.to_string(),
            })?;

        if !status.success() {
            return Err(Error::CommandFailed {
                command: self.to_string(),
                reason: status.to_string(),
            });
        }

        Ok(())
    }
}

impl fmt::Display for InstallCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", shell_quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(arg))?;
        }
        Ok(())
    }
}

/// Quote a word for display in a POSIX shell
fn shell_quote(word: &str) -> String {
    let safe = |c: char| c.is_ascii_alphanumeric() || "-_./:=+@%,".contains(c);
    if !word.is_empty() && word.chars().all(safe) {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn settings() -> InstallSettings {
        InstallSettings {
            sudo: false,
            assume_yes: true,
            refresh: true,
            extra_args: Vec::new(),
        }
    }

    #[test]
    fn test_detect_order() {
        assert_eq!(
            SystemPackageManager::detect_with(|b| b == "rpm" || b == "dpkg-query"),
            SystemPackageManager::Dpkg
        );
        assert_eq!(
            SystemPackageManager::detect_with(|b| b == "pacman"),
            SystemPackageManager::Pacman
        );
        let none = SystemPackageManager::detect_with(|_| false);
        assert_eq!(none, SystemPackageManager::Unknown);
        assert!(!none.is_available());
    }

    #[test]
    fn test_string_forms() {
        assert_eq!(SystemPackageManager::Dpkg.to_string(), "dpkg");
        assert_eq!(
            SystemPackageManager::from_str("pacman").unwrap(),
            SystemPackageManager::Pacman
        );
        assert!(SystemPackageManager::from_str("apk").is_err());
    }

    #[test]
    fn test_apt_install_command() {
        let mut settings = settings();
        settings.extra_args = vec!["--no-install-recommends".to_string()];

        let cmd = SystemPackageManager::Dpkg
            .install_command(&["tesseract-ocr", "poppler-utils"], &settings)
            .unwrap();
        assert_eq!(cmd.program, "apt-get");
        assert_eq!(
            cmd.args,
            vec!["install", "-y", "--no-install-recommends", "tesseract-ocr", "poppler-utils"]
        );
    }

    #[test]
    fn test_dnf_and_pacman_commands() {
        let mut settings = settings();
        settings.assume_yes = false;

        let dnf = SystemPackageManager::Rpm
            .install_command(&["tesseract"], &settings)
            .unwrap();
        assert_eq!(dnf.to_string(), "dnf install tesseract");

        let pacman = SystemPackageManager::Pacman
            .install_command(&["tesseract"], &settings)
            .unwrap();
        assert_eq!(pacman.to_string(), "pacman -Syu --needed tesseract");

        settings.refresh = false;
        let pacman = SystemPackageManager::Pacman
            .install_command(&["tesseract"], &settings)
            .unwrap();
        assert_eq!(pacman.to_string(), "pacman -S --needed tesseract");
    }

    #[test]
    fn test_pacman_has_no_separate_refresh() {
        let settings = settings();
        assert_eq!(
            SystemPackageManager::Pacman.refresh_command(&settings).unwrap(),
            None
        );

        let refresh = SystemPackageManager::Rpm
            .refresh_command(&settings)
            .unwrap()
            .unwrap();
        assert_eq!(refresh.to_string(), "dnf makecache");
    }

    #[test]
    fn test_sudo_prefix() {
        let mut settings = settings();
        settings.sudo = true;

        let cmd = SystemPackageManager::Pacman
            .install_command(&["jq"], &settings)
            .unwrap();
        assert_eq!(cmd.to_string(), "sudo pacman -Syu --needed --noconfirm jq");

        let refresh = SystemPackageManager::Dpkg
            .refresh_command(&settings)
            .unwrap()
            .unwrap();
        assert_eq!(refresh.to_string(), "sudo apt-get update");
    }

    #[test]
    fn test_unknown_manager() {
        let result = SystemPackageManager::Unknown.install_command(&["jq"], &settings());
        assert!(matches!(result, Err(Error::UnsupportedPackageManager)));
        assert!(SystemPackageManager::Unknown.refresh_command(&settings()).is_err());
        assert!(SystemPackageManager::Unknown.installed_packages().is_err());
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("libc6:i386"), "libc6:i386");
        assert_eq!(shell_quote("a b"), "'a b'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
        assert_eq!(shell_quote(""), "''");
    }
}
