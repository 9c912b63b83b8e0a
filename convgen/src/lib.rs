pub mod cli;
pub mod commands;

pub use convgen_core::{config, emitter, error, host, planner, scanner, spec, synth, tooling};
