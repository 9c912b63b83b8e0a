//! Info command - displays detected converters and their planned functions.

use super::{load_config, load_index};
use crate::cli::{Cli, InfoArgs, InfoFormat};
use convgen_core::{
    config::ConvgenConfig,
    error::Result,
    tooling::{ConverterProcessor, DeclarationSummary},
};
use serde::Serialize;

#[derive(Serialize)]
struct InfoReport<'a> {
    config: &'a ConvgenConfig,
    converters: &'a [DeclarationSummary],
    deferred: Vec<String>,
    ignored: Vec<String>,
}

/// Runs the info command.
pub fn run(cli: &Cli, args: &InfoArgs) -> Result<()> {
    let config = load_config(cli, &args.index)?;
    let index = load_index(&config)?;
    let processor = ConverterProcessor::new(index, config);

    let outcome = processor.scan();
    let summaries = processor.inspect()?;
    let report = InfoReport {
        config: processor.config(),
        converters: &summaries,
        deferred: outcome.deferred.iter().map(ToString::to_string).collect(),
        ignored: outcome.ignored.iter().map(ToString::to_string).collect(),
    };

    match args.format {
        InfoFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        InfoFormat::Pretty => print!("{}", render_pretty(&report)),
    }
    Ok(())
}

fn render_pretty(report: &InfoReport<'_>) -> String {
    let config = report.config;
    let mut out = String::new();

    out.push_str("\n=== Configuration ===\n\n");
    out.push_str(&format!("Annotation:  {}\n", config.general.annotation));
    out.push_str(&format!("Index:       {}\n", config.index_path().display()));
    out.push_str(&format!("Output Path: {}\n", config.output_path().display()));
    out.push_str(&format!("Receiver:    {}\n", config.profile.receiver));
    out.push_str(&format!(
        "Parallel:    {}\n",
        if config.general.parallel { "enabled" } else { "disabled" }
    ));

    out.push_str(&format!("\n=== Converters ({}) ===\n", report.converters.len()));
    for summary in report.converters {
        out.push_str(&format!("\n{} -> {}\n", summary.declaration, summary.artifact));
        if let Some(name) = &summary.name {
            out.push_str(&format!("  Name:       {}\n", name));
        }
        if let Some(value_type) = &summary.value_type {
            out.push_str(&format!("  Value type: {}\n", value_type));
        }
        if !summary.variants.is_empty() {
            out.push_str(&format!("  Types:      {}\n", summary.variants.join(", ")));
        }
        if let Some(error) = &summary.error {
            out.push_str(&format!("  Error:      {}\n", error));
            continue;
        }
        if summary.functions.is_empty() {
            out.push_str("  Functions:  (none)\n");
        } else {
            out.push_str("  Functions:\n");
            for function in &summary.functions {
                out.push_str(&format!("    {}\n", function));
            }
        }
    }

    if !report.deferred.is_empty() {
        out.push_str("\n=== Deferred ===\n\n");
        for symbol in &report.deferred {
            out.push_str(&format!("{}\n", symbol));
        }
    }
    if !report.ignored.is_empty() {
        out.push_str("\n=== Ignored ===\n\n");
        for symbol in &report.ignored {
            out.push_str(&format!("{}\n", symbol));
        }
    }
    out
}
