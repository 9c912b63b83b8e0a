//! Command handlers for the convgen CLI.

pub mod generate;
pub mod info;
pub mod init;
pub mod validate;

use crate::cli::{Cli, Commands, IndexArgs};
use convgen_core::{
    config::ConvgenConfig,
    error::Result,
    host::SymbolIndex,
};
use std::env;
use std::path::Path;
use tracing::{debug, info};

/// Dispatches the parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Generate(args) => generate::run(&cli, args),
        Commands::Validate(args) => validate::run(&cli, args),
        Commands::Info(args) => info::run(&cli, args),
        Commands::Init(args) => init::run(&cli, args),
    }
}

/// Loads the configuration named on the command line, or discovers
/// convgen.toml, then applies command-line overrides.
pub fn load_config(cli: &Cli, index: &IndexArgs) -> Result<ConvgenConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            info!("Using configuration file {:?}", path);
            ConvgenConfig::from_toml_path(path)?
        }
        None => ConvgenConfig::new()?,
    };

    if let Some(output) = &cli.output {
        config.output.output_path = absolute(output)?;
        debug!("Output path overridden: {}", config.output.output_path);
    }
    if let Some(path) = &index.index {
        config.scan.index_path = absolute(path)?;
        debug!("Index path overridden: {}", config.scan.index_path);
    }
    Ok(config)
}

pub fn load_index(config: &ConvgenConfig) -> Result<SymbolIndex> {
    let path = config.index_path();
    info!("Loading symbol index from {:?}", path);
    SymbolIndex::load(path)
}

/// Command-line paths are relative to the working directory, not the
/// config file.
fn absolute(path: &Path) -> Result<String> {
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()?.join(path)
    };
    Ok(path.to_string_lossy().into_owned())
}
