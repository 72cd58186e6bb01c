// src/main.rs

use anyhow::Result;
use clap::Parser;
use pkgmanifest::Config;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::Context;

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Completions need neither a config nor a manifest
    if let Commands::Completions { shell } = cli.command {
        return commands::cmd_completions(shell);
    }

    let config = Config::load(cli.config.as_deref())?;
    let ctx = Context::new(cli.manifest, config);
    run(cli.command, &ctx)
}

fn run(command: Commands, ctx: &Context) -> Result<()> {
    match command {
        Commands::Validate { strict } => commands::cmd_validate(ctx, strict),
        Commands::List { group, json } => commands::cmd_list(ctx, group.as_deref(), json),
        Commands::Groups { json } => commands::cmd_groups(ctx, json),
        Commands::Render => commands::cmd_render(ctx),
        Commands::Add { name, group } => commands::cmd_add(ctx, &name, group.as_deref()),
        Commands::Remove { name } => commands::cmd_remove(ctx, &name),
        Commands::Check { verbose, json } => commands::cmd_check(ctx, verbose, json),
        Commands::Install {
            dry_run,
            all,
            no_refresh,
        } => commands::cmd_install(ctx, dry_run, all, no_refresh),
        Commands::Config => commands::cmd_config(ctx),
        Commands::Completions { shell } => commands::cmd_completions(shell),
    }
}
