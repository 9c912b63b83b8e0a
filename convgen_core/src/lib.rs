// convgen - typed converter builder generation for annotated converter classes

// Host symbol access
pub mod host;
pub mod scanner;

// Generation pipeline
pub mod code_writer;
pub mod emitter;
pub mod planner;
pub mod spec;
pub mod synth;

// Common modules
pub mod config;
pub mod error;
pub mod tooling;

// Re-export commonly used items for convenience
pub use config::ConvgenConfig;
pub use emitter::{GeneratedArtifact, emit};
pub use error::{ConvgenError, Result, SpecError};
pub use host::{ConverterDescriptor, SymbolIndex, SymbolResolver, TypeRef};
pub use planner::{PlannedVariant, plan};
pub use spec::{ConverterSpec, RequestedVariant, VariantKind, extract};
pub use tooling::{ConverterProcessor, ProcessingReport};
