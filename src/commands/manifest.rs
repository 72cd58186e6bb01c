// src/commands/manifest.rs

//! Manifest commands
//!
//! Validation, listing and editing of the manifest file itself. None of
//! these touch the system package manager.

use anyhow::{anyhow, Result};
use pkgmanifest::{lint, PackageEntry};
use tracing::info;

use super::Context;

const UNGROUPED: &str = "(ungrouped)";

/// Lint the manifest and print every diagnostic
pub fn cmd_validate(ctx: &Context, strict: bool) -> Result<()> {
    let path = ctx.manifest_path().display();
    let text = ctx.read_manifest_text()?;
    let report = lint(&text);

    for diagnostic in &report.diagnostics {
        println!("{}: {}", path, diagnostic);
    }

    let errors = report.errors().count();
    let warnings = report.warnings().count();

    if errors > 0 || (strict && warnings > 0) {
        println!();
        println!("FAILED: {} error(s), {} warning(s)", errors, warnings);
        return Err(anyhow!("Manifest {} is not valid", path));
    }

    // Lint without errors guarantees the text parses
    let manifest = ctx.load_manifest()?;
    if !report.is_clean() {
        println!();
    }
    println!(
        "OK: {} package(s) in {} group(s), {} warning(s)",
        manifest.len(),
        manifest.groups().len(),
        warnings
    );
    Ok(())
}

/// List packages, optionally restricted to one group
pub fn cmd_list(ctx: &Context, group: Option<&str>, json: bool) -> Result<()> {
    let manifest = ctx.load_manifest()?;

    let entries: Vec<&PackageEntry> = match group {
        Some(label) => manifest.entries_in_group(label).collect(),
        None => manifest.entries().collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        match group {
            Some(label) => println!("No packages in group '{}'", label),
            None => println!("No packages listed"),
        }
        return Ok(());
    }

    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    for entry in &entries {
        println!(
            "{:<width$}  {}",
            entry.name,
            entry.group.as_deref().unwrap_or(UNGROUPED),
            width = width
        );
    }
    Ok(())
}

/// List groups with their package counts
pub fn cmd_groups(ctx: &Context, json: bool) -> Result<()> {
    let manifest = ctx.load_manifest()?;
    let groups = manifest.groups();

    if json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }

    for group in &groups {
        println!(
            "{} ({} package(s))",
            group.label.as_deref().unwrap_or(UNGROUPED),
            group.packages.len()
        );
    }
    Ok(())
}

/// Print the manifest as parsed
pub fn cmd_render(ctx: &Context) -> Result<()> {
    let manifest = ctx.load_manifest()?;
    print!("{}", manifest);
    Ok(())
}

/// Add a package and write the manifest back
pub fn cmd_add(ctx: &Context, name: &str, group: Option<&str>) -> Result<()> {
    let path = ctx.manifest_path();
    let mut manifest = if path.exists() {
        ctx.load_manifest()?
    } else {
        info!("Creating new manifest at {}", path.display());
        pkgmanifest::Manifest::new()
    };

    manifest.add(name, group)?;
    manifest.write_to(path)?;

    let entry = manifest
        .get(name)
        .ok_or_else(|| anyhow!("Package '{}' missing after add", name))?;
    match &entry.group {
        Some(label) => println!("Added '{}' to group '{}'", name, label),
        None => println!("Added '{}'", name),
    }
    Ok(())
}

/// Remove a package and write the manifest back
pub fn cmd_remove(ctx: &Context, name: &str) -> Result<()> {
    let path = ctx.manifest_path();
    let mut manifest = ctx.load_manifest()?;

    let Some(entry) = manifest.remove(name) else {
        return Err(anyhow!(
            "Package '{}' is not listed in {}",
            name,
            path.display()
        ));
    };

    manifest.write_to(path)?;
    match entry.group {
        Some(label) => println!("Removed '{}' from group '{}'", name, label),
        None => println!("Removed '{}'", name),
    }
    Ok(())
}
