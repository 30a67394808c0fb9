use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bcal_cli::commands::{events, next, summary, util};
use bcal_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support; logs go to stderr so
    // stdout stays parseable with --json.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let timeline = util::build_timeline(cli.source.as_deref(), cli.now.as_deref(), &config)?;

    let mut stdout = std::io::stdout().lock();
    match command {
        Commands::Events(args) => events::run(&mut stdout, args, &timeline)?,
        Commands::Summary(args) => summary::run(&mut stdout, args, &timeline)?,
        Commands::Next(args) => next::run(&mut stdout, args, &timeline)?,
    }
    stdout.flush()?;

    Ok(())
}
