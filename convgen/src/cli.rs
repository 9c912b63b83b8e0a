//! Command-line interface definitions for convgen.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// convgen - generates typed converter builder functions from annotated converter classes
#[derive(Parser, Debug)]
#[command(name = "convgen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to convgen.toml configuration file
    #[arg(short, long, global = true, env = "CONVGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output (-v, -vv, -vvv for increasing verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output path override (overrides config file)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate converter builder functions
    Generate(GenerateArgs),

    /// Check every annotated converter without writing anything
    Validate(ValidateArgs),

    /// Display detected converters and the functions they would generate
    Info(InfoArgs),

    /// Initialize a new convgen.toml configuration file
    Init(InitArgs),
}

/// Symbol index selection shared by the commands that read one.
#[derive(Args, Debug, Clone, Default)]
pub struct IndexArgs {
    /// Symbol index file or directory (overrides config file)
    #[arg(long)]
    pub index: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Print generated files instead of writing them
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub index: IndexArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub index: IndexArgs,
}

#[derive(Args, Debug, Clone)]
pub struct InfoArgs {
    /// Output format
    #[arg(long, value_enum, default_value = "pretty")]
    pub format: InfoFormat,

    #[command(flatten)]
    pub index: IndexArgs,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum InfoFormat {
    Pretty,
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Overwrite existing convgen.toml if present
    #[arg(short, long)]
    pub force: bool,
}
