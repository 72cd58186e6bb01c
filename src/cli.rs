// src/cli.rs
//! CLI definitions for pkgmanifest
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pkgmanifest")]
#[command(author = "pkgmanifest Contributors")]
#[command(version)]
#[command(about = "Parse, lint, edit and install system package manifests", long_about = None)]
pub struct Cli {
    /// Path to the manifest file (default: from config, else packages.txt)
    #[arg(short, long, global = true)]
    pub manifest: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check the manifest for errors and style problems
    ///
    /// Reports every malformed line and duplicate package, plus warnings
    /// for ungrouped packages, empty groups and whitespace issues.
    /// Exits with failure if any error is found.
    Validate {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },

    /// List packages with their groups
    List {
        /// Only list packages in this group
        #[arg(short, long)]
        group: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List groups and their package counts
    Groups {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the manifest as parsed
    Render,

    /// Add a package to the manifest
    Add {
        /// Package name
        name: String,

        /// Group header to add the package under (created if missing)
        #[arg(short, long)]
        group: Option<String>,
    },

    /// Remove a package from the manifest
    Remove {
        /// Package name
        name: String,
    },

    /// Check whether every manifest package is installed
    ///
    /// Returns success (exit 0) if all packages are installed,
    /// or failure (exit 1) if any are missing.
    Check {
        /// List every package, not just missing ones
        #[arg(short, long)]
        verbose: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Install manifest packages with the system package manager
    Install {
        /// Show the commands without running them
        #[arg(long)]
        dry_run: bool,

        /// Install every package, not just missing ones
        #[arg(long)]
        all: bool,

        /// Skip refreshing repository metadata
        #[arg(long)]
        no_refresh: bool,
    },

    /// Show the effective configuration as TOML
    Config,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
