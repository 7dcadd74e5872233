//! Parcel CLI: incremental per-package facade builds.
//!
//! Provides `parcel build` to run an incremental pass over the configured
//! targets, `parcel status` to show pending source changes, and
//! `parcel inspect` to decode a compiled unit.

#![warn(missing_docs)]

mod build;
mod inspect;
mod pipeline;
mod status;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Parcel: compiles `.p` sources and keeps one facade per package.
#[derive(Parser, Debug)]
#[command(name = "parcel", version, about = "Parcel incremental builder")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `parcel.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run an incremental build pass.
    Build(BuildArgs),
    /// Show source changes since the last successful pass.
    Status(StatusArgs),
    /// Decode and print a compiled unit.
    Inspect(InspectArgs),
}

/// Arguments for the `parcel build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Targets to build (default: all).
    #[arg(short, long)]
    pub target: Vec<String>,

    /// Recompile every source, ignoring recorded hashes.
    #[arg(long)]
    pub rebuild: bool,
}

/// Arguments for the `parcel status` subcommand.
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Targets to check (default: all).
    #[arg(short, long)]
    pub target: Vec<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `parcel inspect` subcommand.
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Path to a `.unit` file.
    pub file: String,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

impl GlobalArgs {
    /// Default log level for these flags; `RUST_LOG` overrides it.
    fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(global.log_level())),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let result = match cli.command {
        Command::Build(ref args) => build::run(args, &global),
        Command::Status(ref args) => status::run(args, &global),
        Command::Inspect(ref args) => inspect::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
