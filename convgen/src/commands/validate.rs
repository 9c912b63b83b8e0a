//! Validate command - extracts and plans every converter without writing.

use super::{load_config, load_index};
use crate::cli::{Cli, ValidateArgs};
use convgen_core::{
    error::{ConvgenError, Result},
    tooling::ConverterProcessor,
};
use tracing::{error, info, warn};

/// Runs the validate command.
pub fn run(cli: &Cli, args: &ValidateArgs) -> Result<()> {
    info!("Validating convgen configuration and converters");

    let config = load_config(cli, &args.index)?;
    info!("  Configuration file: OK");
    info!("    Annotation: {}", config.general.annotation);
    info!("    Output path: {}", config.output_path().display());

    let index = load_index(&config)?;
    info!("  Symbol index: OK ({} declarations)", index.len());

    let processor = ConverterProcessor::new(index, config);
    let outcome = processor.scan();
    for symbol in &outcome.deferred {
        warn!("  {}: unresolved, deferred", symbol);
    }
    for symbol in &outcome.ignored {
        warn!("  {}: not a class, ignored", symbol);
    }

    let summaries = processor.inspect()?;
    let mut failed = 0;
    for summary in &summaries {
        match &summary.error {
            Some(message) => {
                error!("  {}: FAILED", summary.declaration);
                error!("    Error: {}", message);
                failed += 1;
            }
            None if summary.functions.is_empty() => {
                warn!("  {}: OK, but generates no builder functions", summary.declaration);
            }
            None => {
                info!(
                    "  {}: OK ({} functions)",
                    summary.declaration,
                    summary.functions.len()
                );
            }
        }
        for unsupported in &summary.unsupported {
            warn!("    Unsupported converter type: {}", unsupported);
        }
    }

    if failed > 0 {
        error!("Validation failed with errors");
        return Err(ConvgenError::config(format!(
            "{} of {} converter declarations failed validation",
            failed,
            summaries.len()
        )));
    }

    info!("Validation passed ({} converters)", summaries.len());
    Ok(())
}
