//! Run-level tooling: driving a whole generation run and writing its output.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use convgen_core::tooling::generate;
//!
//! let report = generate().expect("converter generation failed");
//! println!("wrote {} files", report.written.len());
//! ```

mod processor;
mod writer;

pub use processor::*;
pub use writer::*;

use crate::config::ConvgenConfig;
use crate::error::Result;
use crate::host::SymbolIndex;

/// Loads `convgen.toml`, reads the symbol index it points at and writes
/// every generated artifact below the configured output path.
pub fn generate() -> Result<ProcessingReport> {
    generate_with_config(ConvgenConfig::new()?)
}

/// Same as [`generate`], with a configuration built elsewhere.
pub fn generate_with_config(config: ConvgenConfig) -> Result<ProcessingReport> {
    let index = SymbolIndex::load(config.index_path())?;
    let writer = FsArtifactWriter::from_config(&config);
    ConverterProcessor::new(index, config).run(&writer)
}
