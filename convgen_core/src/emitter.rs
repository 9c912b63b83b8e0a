//! Assembles the generated source file for one converter.

use crate::code_writer::CodeWriter;
use crate::config::ProfileConfig;
use crate::error::SpecError;
use crate::planner::PlannedVariant;
use crate::spec::ConverterSpec;
use crate::synth::{FunctionSpec, SynthesisContext, synthesize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// One generated source file. Written once, never appended to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    /// Qualified name of the declaration this was generated from.
    pub declaration: String,
    pub package: String,
    pub file_base_name: String,
    pub text: String,
    /// Names of the builder functions in `text`, in order.
    pub functions: Vec<String>,
    pub source_file: Option<PathBuf>,
}

impl GeneratedArtifact {
    /// `<package as directories>/<base name>.<extension>`.
    pub fn relative_path(&self, extension: &str) -> PathBuf {
        let mut path = PathBuf::new();
        for segment in self.package.split('.').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path.join(format!("{}.{}", self.file_base_name, extension))
    }

    pub fn path_under(&self, root: &Path, extension: &str) -> PathBuf {
        root.join(self.relative_path(extension))
    }
}

fn synthesis_context(spec: &ConverterSpec, profile: &ProfileConfig) -> SynthesisContext {
    SynthesisContext {
        converter: spec.source.simple_name.clone(),
        display_name: spec.name.clone(),
        value_type: spec.value_type_name().to_string(),
        receiver: profile.receiver.clone(),
    }
}

/// Synthesizes every planned function of `spec`.
pub fn synthesize_functions(
    spec: &ConverterSpec,
    planned: &[PlannedVariant],
    profile: &ProfileConfig,
) -> Result<Vec<FunctionSpec>, SpecError> {
    let context = synthesis_context(spec, profile);

    planned
        .iter()
        .filter_map(|entry| match entry {
            PlannedVariant::Function { kind, has_choice } => {
                Some(synthesize(*kind, &context, *has_choice))
            }
            PlannedVariant::ChoiceModifier | PlannedVariant::Unsupported(_) => None,
        })
        .collect()
}

/// Renders the artifact for `spec`, or `None` if the plan contains no
/// builder function at all.
pub fn emit(
    spec: &ConverterSpec,
    planned: &[PlannedVariant],
    profile: &ProfileConfig,
) -> Result<Option<GeneratedArtifact>, SpecError> {
    let context = synthesis_context(spec, profile);

    let mut blocks = Vec::new();
    let mut functions = Vec::new();
    for entry in planned {
        match entry {
            PlannedVariant::Function { kind, has_choice } => {
                let function = synthesize(*kind, &context, *has_choice)?;
                functions.push(function.name.clone());
                blocks.push(function.to_source());
            }
            PlannedVariant::Unsupported(name) => {
                blocks.push(format!("// Unsupported converter type: {}\n", name));
            }
            PlannedVariant::ChoiceModifier => {}
        }
    }

    if functions.is_empty() {
        debug!(
            declaration = %spec.source.qualified_name,
            "No builder functions planned, skipping artifact"
        );
        return Ok(None);
    }

    let mut text = render_preamble(spec, profile);
    let body = blocks
        .iter()
        .map(|block| block.trim_end_matches('\n'))
        .collect::<Vec<_>>()
        .join("\n\n");
    text.push_str(&body);
    text.push('\n');

    Ok(Some(GeneratedArtifact {
        declaration: spec.source.qualified_name.clone(),
        package: spec.source.package_name.clone(),
        file_base_name: spec.source.artifact_base_name(),
        text,
        functions,
        source_file: spec.source.containing_file.clone(),
    }))
}

fn render_preamble(spec: &ConverterSpec, profile: &ProfileConfig) -> String {
    let mut output = String::new();
    let mut w = CodeWriter::with_indent_spaces(&mut output, 4);
    // Writing into a String cannot fail.
    let _ = write_preamble(&mut w, spec, profile);
    output
}

fn write_preamble<W: std::fmt::Write>(
    w: &mut CodeWriter<W>,
    spec: &ConverterSpec,
    profile: &ProfileConfig,
) -> std::fmt::Result {
    if !profile.opt_ins.is_empty() {
        w.writeln("@file:OptIn(")?;
        {
            let _indent = w.indent();
            let last = profile.opt_ins.len() - 1;
            for (index, opt_in) in profile.opt_ins.iter().enumerate() {
                let separator = if index == last { "" } else { "," };
                w.writeln(&format!("{}::class{}", opt_in, separator))?;
            }
        }
        w.writeln(")")?;
        w.blank_line()?;
    }

    if !spec.source.package_name.is_empty() {
        w.writeln(&format!("package {}", spec.source.package_name))?;
        w.blank_line()?;
    }

    w.writeln("// Converter type param")?;
    w.writeln(&format!("import {}", spec.value_type_import()))?;
    w.blank_line()?;

    w.writeln("// Original converter class, for safety")?;
    w.writeln(&format!("import {}", spec.source.qualified_name))?;
    w.blank_line()?;

    if !profile.runtime_imports.is_empty() {
        w.writeln("// Imports that all converters need")?;
        for import in &profile.runtime_imports {
            w.writeln(&format!("import {}", import))?;
        }
        w.blank_line()?;
    }

    if !spec.extra_imports.is_empty() {
        w.writeln("// Extra imports")?;
        for import in &spec.extra_imports {
            w.writeln(&format!("import {}", import))?;
        }
        w.blank_line()?;
    }

    Ok(())
}
