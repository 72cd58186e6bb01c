// src/commands/system.rs

//! System commands
//!
//! Compare the manifest with the host's installed packages and hand missing
//! packages to the system package manager.

use anyhow::{anyhow, Result};
use pkgmanifest::{compute_status, SystemPackageManager};
use tracing::info;

use super::Context;

fn package_manager(ctx: &Context) -> Result<SystemPackageManager> {
    let pm = ctx.config.package_manager();
    if !pm.is_available() {
        return Err(anyhow!(
            "No supported package manager found. pkgmanifest supports dpkg, rpm and pacman."
        ));
    }
    Ok(pm)
}

/// Check that every manifest package is installed
pub fn cmd_check(ctx: &Context, verbose: bool, json: bool) -> Result<()> {
    let manifest = ctx.load_manifest()?;
    let pm = package_manager(ctx)?;
    let installed = pm.installed_packages()?;
    let report = compute_status(&manifest, &installed);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.is_satisfied() {
        println!("OK: All {} package(s) installed", report.entries.len());
    } else {
        let missing = report.missing();
        println!(
            "MISSING: {} of {} package(s) not installed",
            missing.len(),
            report.entries.len()
        );
        println!();

        for status in &report.entries {
            if status.installed && !verbose {
                continue;
            }
            let marker = if status.installed { "ok" } else { "missing" };
            match &status.entry.group {
                Some(group) => println!("  {:<8} {} ({})", marker, status.entry.name, group),
                None => println!("  {:<8} {}", marker, status.entry.name),
            }
        }
    }

    if !report.is_satisfied() {
        // Exit code signals drift for scripts and CI
        std::process::exit(1);
    }
    Ok(())
}

/// Install manifest packages through the system package manager
pub fn cmd_install(ctx: &Context, dry_run: bool, all: bool, no_refresh: bool) -> Result<()> {
    let manifest = ctx.load_manifest()?;
    let pm = package_manager(ctx)?;
    let mut settings = ctx.config.install.clone();
    if no_refresh {
        settings.refresh = false;
    }

    let packages: Vec<String> = if all {
        manifest.names().into_iter().map(str::to_string).collect()
    } else {
        let installed = pm.installed_packages()?;
        compute_status(&manifest, &installed)
            .missing()
            .into_iter()
            .map(|e| e.name.clone())
            .collect()
    };

    if packages.is_empty() {
        println!("Nothing to install: all {} package(s) are installed", manifest.len());
        return Ok(());
    }

    let mut commands = Vec::new();
    if settings.refresh {
        commands.extend(pm.refresh_command(&settings)?);
    }
    commands.push(pm.install_command(&packages, &settings)?);

    if dry_run {
        println!("Dry run: would install {} package(s) with {}", packages.len(), pm);
        for cmd in &commands {
            println!("  {}", cmd);
        }
        return Ok(());
    }

    info!("Installing {} package(s) with {}", packages.len(), pm);
    for cmd in &commands {
        println!("Running: {}", cmd);
        cmd.run()?;
    }

    println!("Installed {} package(s)", packages.len());
    Ok(())
}
