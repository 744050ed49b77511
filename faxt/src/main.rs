//! Faxt CLI - the fax compiler front end.
//!
//! This is the main entry point for the faxt CLI application.
//! It uses clap for argument parsing and dispatches to appropriate
//! command handlers based on user input.

mod commands;
mod config;
mod error;
mod manifest;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{
    build::{run_build, BuildArgs},
    new::{run_new, NewArgs},
    run::{run_run, RunArgs},
};
use error::{FaxtError, Result};

/// Faxt - the fax compiler front end
#[derive(Parser, Debug)]
#[command(name = "faxt")]
#[command(author = "Fax Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scaffold, build, and run fax projects", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, env = "FAXT_VERBOSE")]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "FAXT_CONFIG")]
    config: Option<PathBuf>,

    /// Disable color output
    #[arg(long, global = true, env = "FAXT_NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the faxt CLI.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Scaffold a new fax project
    New(NewCommand),

    /// Compile and link the project
    Build(BuildCommand),

    /// Compile, link, and run the project
    Run(RunCommand),
}

/// Arguments for the new subcommand.
#[derive(Parser, Debug)]
struct NewCommand {
    /// Project id (also the produced executable's name)
    id: String,

    /// Directory to create the project in (default: ./<id>)
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Overwrite an existing, non-empty directory
    #[arg(short, long)]
    force: bool,
}

/// Arguments for the build subcommand.
#[derive(Parser, Debug)]
struct BuildCommand {
    /// Project root directory (default: current directory)
    #[arg(short, long)]
    project: Option<PathBuf>,
}

/// Arguments for the run subcommand.
#[derive(Parser, Debug)]
struct RunCommand {
    /// Project root directory (default: current directory)
    #[arg(short, long)]
    project: Option<PathBuf>,
}

/// Main entry point for the faxt CLI.
fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.no_color)?;

    // A global faxt.toml only ever supplies a default verbosity; an
    // explicit -v always wins.
    let config = load_config(cli.config.as_deref())?;
    let verbose = cli.verbose || config.verbose;

    execute_command(cli.command, verbose)
}

/// Initialize the logging system.
fn init_logging(verbose: bool, no_color: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let subscriber = fmt::layer()
        .with_ansi(!no_color)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .map_err(|e| FaxtError::Config(format!("Failed to initialize logging: {}", e)))?;

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(config_path: Option<&std::path::Path>) -> Result<config::Config> {
    match config_path {
        Some(path) => config::Config::load_from_path(path),
        None => config::Config::load(),
    }
}

/// Execute the selected command.
fn execute_command(command: Commands, verbose: bool) -> Result<()> {
    match command {
        Commands::New(args) => execute_new(args, verbose),
        Commands::Build(args) => execute_build(args, verbose),
        Commands::Run(args) => execute_run(args, verbose),
    }
}

fn execute_new(args: NewCommand, verbose: bool) -> Result<()> {
    run_new(NewArgs {
        id: args.id,
        path: args.path,
        force: args.force,
        verbose,
    })
}

fn execute_build(args: BuildCommand, verbose: bool) -> Result<()> {
    run_build(BuildArgs {
        verbose,
        project: args.project,
    })
}

fn execute_run(args: RunCommand, verbose: bool) -> Result<()> {
    run_run(RunArgs {
        verbose,
        project: args.project,
    })
}
