//! multipatch CLI - provision tracking branches and print merged logs
//!
//! `create` sets up the remotes and tracking branches named in a repository's
//! `multipatch.yml`; `log` prints the history of several branches as one
//! chronological stream.

mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use multipatch_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{CreateArgs, LogArgs};

/// multipatch: follow many branches of a repository at once
#[derive(Parser, Debug)]
#[command(name = "multipatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the manifest's remotes and tracking branches
    Create(CreateArgs),

    /// Print the logs of the tracked branches in chronological order
    Log(LogArgs),

    /// Show current configuration
    Config,

    /// Show version information
    Version,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout carries the log stream, diagnostics go to stderr
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn show_config() -> anyhow::Result<()> {
    let config = Config::load()?.with_env_overrides()?;

    println!("multipatch configuration");
    println!("========================");
    println!();
    println!("Log settings:");
    println!("  exclude: {}", config.log.exclude.join(", "));
    println!("  summary_width: {}", config.log.summary_width);
    println!("  date_format: {}", config.log.date_format);
    println!();
    if let Some(path) = Config::default_config_path() {
        println!("Config file: {}", path.display());
        if path.exists() {
            println!("  (exists)");
        } else {
            println!("  (not found - using defaults)");
        }
    }

    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Create(args) => args.execute(),
        Commands::Log(args) => args.execute(),
        Commands::Config => show_config(),
        Commands::Version => {
            println!("multipatch {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
