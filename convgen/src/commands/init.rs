//! Init command - initializes convgen.toml configuration.

use crate::cli::{Cli, InitArgs};
use convgen_core::{
    config::CONFIG_FILE_NAME,
    error::{ConvgenError, Result},
};
use std::fs;
use std::path::Path;
use tracing::{error, info};

/// Runs the init command.
pub fn run(_cli: &Cli, args: &InitArgs) -> Result<()> {
    init_in(Path::new("."), args.force)
}

pub fn init_in(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        error!("{} already exists. Use --force to overwrite.", CONFIG_FILE_NAME);
        return Err(ConvgenError::config(format!(
            "{} already exists",
            config_path.display()
        )));
    }

    fs::write(&config_path, template())?;
    info!("Created {}", config_path.display());

    info!("Next steps:");
    info!("  1. Export the resolved symbol index of your Kotlin sources into build/convgen/");
    info!("  2. Annotate converter classes with @Converter(name, types, imports)");
    info!("  3. Run 'convgen generate'");

    Ok(())
}

pub fn template() -> String {
    r#"# convgen configuration

[general]
# Annotation marking converter classes
annotation = "com.kotlindiscord.kord.extensions.modules.annotations.converters.Converter"
# Generate declarations in parallel
parallel = true

[scan]
# A *.symbols.toml / *.symbols.json file, or a directory containing them
index_path = "${CONVGEN_INDEX:-./build/convgen/}"

[output]
# Generated sources land at <output_path>/<package path>/<Name>Functions.<file_extension>
output_path = "./build/generated/convgen/"
file_extension = "kt"

[profile]
# Extension receiver of every generated builder
receiver = "Arguments"
opt_ins = [
    "KordPreview",
    "ConverterToDefaulting",
    "ConverterToMulti",
    "ConverterToOptional",
]
runtime_imports = [
    "com.kotlindiscord.kord.extensions.commands.converters.*",
    "com.kotlindiscord.kord.extensions.commands.parser.Arguments",
    "dev.kord.common.annotation.KordPreview",
]
"#
    .to_string()
}
