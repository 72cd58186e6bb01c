// src/commands/mod.rs
//! Command handlers for the pkgmanifest CLI

mod manifest;
mod system;

pub use manifest::{cmd_add, cmd_groups, cmd_list, cmd_remove, cmd_render, cmd_validate};
pub use system::{cmd_check, cmd_install};

use anyhow::{Context as _, Result};
use clap::CommandFactory;
use clap_complete::Shell;
use pkgmanifest::{parse_manifest, Config, Manifest};
use std::path::{Path, PathBuf};

use crate::cli::Cli;

/// Shared state for command handlers
pub struct Context {
    pub manifest_path: PathBuf,
    pub config: Config,
}

impl Context {
    /// Resolve the manifest path: CLI flag first, then the config file
    pub fn new(manifest: Option<PathBuf>, config: Config) -> Self {
        let manifest_path = manifest.unwrap_or_else(|| config.manifest_path());
        Self {
            manifest_path,
            config,
        }
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Read the manifest file as text
    pub fn read_manifest_text(&self) -> Result<String> {
        std::fs::read_to_string(&self.manifest_path).with_context(|| {
            format!("Failed to read manifest {}", self.manifest_path.display())
        })
    }

    /// Read and parse the manifest file
    pub fn load_manifest(&self) -> Result<Manifest> {
        let text = self.read_manifest_text()?;
        parse_manifest(&text)
            .with_context(|| format!("Invalid manifest {}", self.manifest_path.display()))
    }
}

/// Print the effective configuration
///
/// The manifest path shown is the one commands will use, including a
/// `--manifest` override.
pub fn cmd_config(ctx: &Context) -> Result<()> {
    let mut config = ctx.config.clone();
    config.manifest = Some(ctx.manifest_path.clone());
    print!("{}", config.to_toml()?);
    Ok(())
}

/// Print a shell completion script to stdout
pub fn cmd_completions(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "pkgmanifest", &mut std::io::stdout());
    Ok(())
}
