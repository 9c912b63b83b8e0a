//! Generate command - writes builder functions for every converter.

use super::{load_config, load_index};
use crate::cli::{Cli, GenerateArgs};
use convgen_core::{
    error::Result,
    tooling::{ConverterProcessor, FsArtifactWriter, MemoryArtifactWriter, ProcessingReport},
};
use tracing::{error, info, warn};

/// Runs the generate command.
pub fn run(cli: &Cli, args: &GenerateArgs) -> Result<()> {
    let config = load_config(cli, &args.index)?;
    let index = load_index(&config)?;
    let extension = config.output.file_extension.clone();
    let output_root = config.output_path();
    let processor = ConverterProcessor::new(index, config);

    let report = if args.dry_run {
        info!("Dry run: nothing will be written");
        let writer = MemoryArtifactWriter::new(extension);
        let report = processor.run(&writer)?;
        for (path, text) in writer.files() {
            println!("// ==> {}", output_root.join(path).display());
            print!("{}", text);
            println!();
        }
        report
    } else {
        let writer = FsArtifactWriter::new(output_root, extension);
        processor.run(&writer)?
    };

    summarize(&report)
}

/// Logs the run outcome and turns declaration failures into an error.
pub(crate) fn summarize(report: &ProcessingReport) -> Result<()> {
    for symbol in &report.deferred {
        warn!("Deferred (unresolved): {}", symbol);
    }
    for declaration in &report.empty {
        warn!("No builder functions generated for {}", declaration);
    }
    for failure in &report.failures {
        error!("{}", failure.to_error());
    }

    info!(
        "Generated {} functions in {} files",
        report.function_count(),
        report.artifacts.len()
    );

    match report.failures.first() {
        Some(first) => {
            error!("{} converter declaration(s) failed", report.failures.len());
            Err(first.to_error())
        }
        None => Ok(()),
    }
}
