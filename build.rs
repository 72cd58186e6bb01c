// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: emit JSON
fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output as JSON")
}

fn build_cli() -> Command {
    Command::new("pkgmanifest")
        .version(env!("CARGO_PKG_VERSION"))
        .author("pkgmanifest Contributors")
        .about("Parse, lint, edit and install system package manifests")
        .arg(
            Arg::new("manifest")
                .short('m')
                .long("manifest")
                .value_name("PATH")
                .global(true)
                .help("Path to the manifest file (default: from config, else packages.txt)"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .global(true)
                .help("Path to the config file"),
        )
        .subcommand(
            Command::new("validate")
                .about("Check the manifest for errors and style problems")
                .arg(
                    Arg::new("strict")
                        .long("strict")
                        .action(ArgAction::SetTrue)
                        .help("Treat warnings as errors"),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("List packages with their groups")
                .arg(
                    Arg::new("group")
                        .short('g')
                        .long("group")
                        .help("Only list packages in this group"),
                )
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("groups")
                .about("List groups and their package counts")
                .arg(json_arg()),
        )
        .subcommand(Command::new("render").about("Print the manifest as parsed"))
        .subcommand(
            Command::new("add")
                .about("Add a package to the manifest")
                .arg(Arg::new("name").required(true).help("Package name"))
                .arg(
                    Arg::new("group")
                        .short('g')
                        .long("group")
                        .help("Group header to add the package under (created if missing)"),
                ),
        )
        .subcommand(
            Command::new("remove")
                .about("Remove a package from the manifest")
                .arg(Arg::new("name").required(true).help("Package name")),
        )
        .subcommand(
            Command::new("check")
                .about("Check whether every manifest package is installed")
                .arg(
                    Arg::new("verbose")
                        .short('v')
                        .long("verbose")
                        .action(ArgAction::SetTrue)
                        .help("List every package, not just missing ones"),
                )
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("install")
                .about("Install manifest packages with the system package manager")
                .arg(
                    Arg::new("dry_run")
                        .long("dry-run")
                        .action(ArgAction::SetTrue)
                        .help("Show the commands without running them"),
                )
                .arg(
                    Arg::new("all")
                        .long("all")
                        .action(ArgAction::SetTrue)
                        .help("Install every package, not just missing ones"),
                )
                .arg(
                    Arg::new("no_refresh")
                        .long("no-refresh")
                        .action(ArgAction::SetTrue)
                        .help("Skip refreshing repository metadata"),
                ),
        )
        .subcommand(Command::new("config").about("Show the effective configuration as TOML"))
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(Arg::new("shell").required(true).help("Shell to generate completions for")),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("pkgmanifest.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
