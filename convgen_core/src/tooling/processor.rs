//! Run driver: scan, generate, write.

use super::ArtifactWriter;
use crate::config::ConvgenConfig;
use crate::emitter::{GeneratedArtifact, emit, synthesize_functions};
use crate::error::{ConvgenError, Result, SpecError};
use crate::host::{ConverterDescriptor, Symbol, SymbolResolver};
use crate::planner::{PlannedVariant, plan};
use crate::scanner::{ScanOutcome, scan};
use crate::spec::extract;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, error, info};

type GenerationResult = std::result::Result<Option<GeneratedArtifact>, SpecError>;

/// A declaration that could not be generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationFailure {
    pub declaration: String,
    pub error: SpecError,
}

impl DeclarationFailure {
    pub fn to_error(&self) -> ConvgenError {
        ConvgenError::spec(self.declaration.clone(), self.error.clone())
    }
}

/// Outcome of one processing run. All lists are ordered by qualified name.
#[derive(Debug, Clone, Default)]
pub struct ProcessingReport {
    pub artifacts: Vec<GeneratedArtifact>,
    /// Declarations that planned no builder function and produced no artifact.
    pub empty: Vec<String>,
    pub failures: Vec<DeclarationFailure>,
    pub deferred: Vec<Symbol>,
    pub ignored: Vec<Symbol>,
    /// Paths written by [`ConverterProcessor::run`]; empty otherwise.
    pub written: Vec<PathBuf>,
}

impl ProcessingReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn function_count(&self) -> usize {
        self.artifacts.iter().map(|a| a.functions.len()).sum()
    }
}

/// What a declaration would generate, for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclarationSummary {
    pub declaration: String,
    pub artifact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
    pub variants: Vec<String>,
    /// Builder function call shapes in emission order.
    pub functions: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unsupported: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Drives generation for every annotated declaration a resolver knows.
pub struct ConverterProcessor<R> {
    resolver: R,
    config: ConvgenConfig,
}

impl<R: SymbolResolver> ConverterProcessor<R> {
    pub fn new(resolver: R, config: ConvgenConfig) -> Self {
        Self { resolver, config }
    }

    pub fn config(&self) -> &ConvgenConfig {
        &self.config
    }

    pub fn scan(&self) -> ScanOutcome {
        scan(&self.resolver, &self.config.general.annotation)
    }

    /// Generates every artifact without writing anything.
    ///
    /// Per-declaration errors are collected in the report. An artifact
    /// collision fails the whole run before any generation happens.
    pub fn process(&self) -> Result<ProcessingReport> {
        info!("Starting converter processing");
        let outcome = self.scan();
        check_collisions(&outcome.valid)?;

        let results: Vec<(String, GenerationResult)> = if self.config.general.parallel {
            outcome
                .valid
                .par_iter()
                .map(|declaration| self.process_one(declaration))
                .collect()
        } else {
            outcome
                .valid
                .iter()
                .map(|declaration| self.process_one(declaration))
                .collect()
        };

        let mut report = ProcessingReport {
            deferred: outcome.deferred,
            ignored: outcome.ignored,
            ..ProcessingReport::default()
        };
        for (declaration, result) in results {
            match result {
                Ok(Some(artifact)) => report.artifacts.push(artifact),
                Ok(None) => report.empty.push(declaration),
                Err(error) => report.failures.push(DeclarationFailure { declaration, error }),
            }
        }

        info!(
            artifacts = report.artifacts.len(),
            functions = report.function_count(),
            failures = report.failures.len(),
            deferred = report.deferred.len(),
            "Converter processing complete"
        );
        Ok(report)
    }

    /// Processes, then writes every generated artifact through `writer`.
    pub fn run(&self, writer: &dyn ArtifactWriter) -> Result<ProcessingReport> {
        let mut report = self.process()?;
        for artifact in &report.artifacts {
            report.written.push(writer.write(artifact)?);
        }
        Ok(report)
    }

    /// Extracts and plans every declaration without emitting text.
    pub fn inspect(&self) -> Result<Vec<DeclarationSummary>> {
        let outcome = self.scan();
        check_collisions(&outcome.valid)?;
        Ok(outcome
            .valid
            .iter()
            .map(|declaration| self.summarize(declaration))
            .collect())
    }

    fn process_one(&self, declaration: &ConverterDescriptor) -> (String, GenerationResult) {
        debug!(declaration = %declaration.qualified_name, "Processing declaration");
        let result = self.generate(declaration);
        if let Err(err) = &result {
            error!(declaration = %declaration.qualified_name, "{}", err);
        }
        (declaration.qualified_name.clone(), result)
    }

    fn generate(&self, declaration: &ConverterDescriptor) -> GenerationResult {
        let spec = extract(&self.resolver, declaration, &self.config.general.annotation)?;
        let planned = plan(&spec)?;
        emit(&spec, &planned, &self.config.profile)
    }

    fn summarize(&self, declaration: &ConverterDescriptor) -> DeclarationSummary {
        let mut summary = DeclarationSummary {
            declaration: declaration.qualified_name.clone(),
            artifact: declaration.artifact_identity(),
            name: None,
            value_type: None,
            variants: Vec::new(),
            functions: Vec::new(),
            unsupported: Vec::new(),
            error: None,
        };

        let spec = match extract(&self.resolver, declaration, &self.config.general.annotation) {
            Ok(spec) => spec,
            Err(err) => {
                summary.error = Some(err.to_string());
                return summary;
            }
        };
        summary.name = Some(spec.name.clone());
        summary.value_type = Some(spec.value_type_import().to_string());
        summary.variants = spec.variants.iter().map(|v| v.name().to_string()).collect();

        let planned = match plan(&spec) {
            Ok(planned) => planned,
            Err(err) => {
                summary.error = Some(err.to_string());
                return summary;
            }
        };
        summary.unsupported = planned
            .iter()
            .filter_map(|entry| match entry {
                PlannedVariant::Unsupported(name) => Some(name.clone()),
                _ => None,
            })
            .collect();

        match synthesize_functions(&spec, &planned, &self.config.profile) {
            Ok(functions) => {
                summary.functions = functions.iter().map(|f| f.signature()).collect();
            }
            Err(err) => summary.error = Some(err.to_string()),
        }
        summary
    }
}

/// Fails if two declarations would generate the same artifact.
pub fn check_collisions(declarations: &[ConverterDescriptor]) -> Result<()> {
    let mut seen: BTreeMap<String, &str> = BTreeMap::new();
    for declaration in declarations {
        let identity = declaration.artifact_identity();
        if let Some(first) = seen.get(&identity) {
            error!(artifact = %identity, "Artifact collision");
            return Err(ConvgenError::ArtifactCollision {
                artifact: identity,
                first: first.to_string(),
                second: declaration.qualified_name.clone(),
            });
        }
        seen.insert(identity, &declaration.qualified_name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{
        AnnotationArguments, AnnotationValue, MockSymbolResolver, SymbolKind, TypeRef,
    };
    use crate::tooling::MemoryArtifactWriter;
    use pretty_assertions::assert_eq;

    const ANNOTATION: &str = "com.example.Converter";

    fn descriptor(qualified_name: &str) -> ConverterDescriptor {
        let (package, simple) = qualified_name.rsplit_once('.').unwrap();
        ConverterDescriptor {
            qualified_name: qualified_name.to_string(),
            simple_name: simple.to_string(),
            package_name: package.to_string(),
            supertypes: vec![
                TypeRef::resolved("a.SingleConverter")
                    .with_argument(TypeRef::resolved("kotlin.String")),
            ],
            containing_file: None,
        }
    }

    fn arguments(name: &str, types: &[&str]) -> AnnotationArguments {
        let mut arguments = AnnotationArguments::new();
        arguments.insert("name".to_string(), AnnotationValue::String(name.to_string()));
        arguments.insert(
            "types".to_string(),
            AnnotationValue::List(
                types
                    .iter()
                    .map(|t| AnnotationValue::String(t.to_string()))
                    .collect(),
            ),
        );
        arguments
    }

    fn resolver(declarations: Vec<(&'static str, &'static [&'static str])>) -> MockSymbolResolver {
        let symbols: Vec<Symbol> = declarations
            .iter()
            .map(|(name, _)| Symbol::new(*name, SymbolKind::Class))
            .collect();
        let mut resolver = MockSymbolResolver::new();
        resolver
            .expect_symbols_with_annotation()
            .returning(move |_| symbols.clone());
        resolver
            .expect_resolve_declaration()
            .returning(|symbol| Some(descriptor(&symbol.qualified_name)));
        resolver
            .expect_read_annotation_arguments()
            .returning(move |declaration, _| {
                declarations
                    .iter()
                    .find(|(name, _)| *name == declaration.qualified_name)
                    .map(|(_, types)| arguments("string", types))
            });
        resolver
            .expect_resolve_first_supertype_value_type()
            .returning(|_| Some(TypeRef::resolved("kotlin.String")));
        resolver
    }

    fn config(parallel: bool) -> ConvgenConfig {
        ConvgenConfig::builder()
            .annotation(ANNOTATION)
            .parallel(parallel)
            .build()
    }

    #[test]
    fn test_failure_does_not_affect_other_declarations() {
        let processor = ConverterProcessor::new(
            resolver(vec![
                ("a.BadConverter", &["LIST", "CHOICE"]),
                ("a.GoodConverter", &["SINGLE"]),
            ]),
            config(true),
        );

        let report = processor.process().unwrap();

        assert_eq!(report.artifacts.len(), 1);
        assert_eq!(report.artifacts[0].declaration, "a.GoodConverter");
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].declaration, "a.BadConverter");
        assert!(matches!(
            report.failures[0].error,
            SpecError::IncompatibleVariants { .. }
        ));
    }

    #[test]
    fn test_parallel_and_sequential_runs_agree() {
        let declarations: Vec<(&'static str, &'static [&'static str])> = vec![
            ("a.OneConverter", &["SINGLE", "OPTIONAL"]),
            ("b.TwoConverter", &["LIST"]),
            ("c.ThreeConverter", &["CHOICE", "DEFAULTING"]),
        ];
        let parallel = ConverterProcessor::new(resolver(declarations.clone()), config(true))
            .process()
            .unwrap();
        let sequential = ConverterProcessor::new(resolver(declarations), config(false))
            .process()
            .unwrap();

        assert_eq!(parallel.artifacts, sequential.artifacts);
    }

    #[test]
    fn test_choice_only_declaration_is_reported_empty() {
        let processor = ConverterProcessor::new(
            resolver(vec![("a.ColorConverter", &["CHOICE"])]),
            config(false),
        );
        let report = processor.process().unwrap();
        assert!(report.artifacts.is_empty());
        assert_eq!(report.empty, vec!["a.ColorConverter".to_string()]);
        assert!(!report.has_failures());
    }

    #[test]
    fn test_collision_fails_before_generation() {
        let mut resolver = MockSymbolResolver::new();
        resolver.expect_symbols_with_annotation().returning(|_| {
            vec![
                Symbol::new("a.Outer.InnerConverter", SymbolKind::Class),
                Symbol::new("a.InnerConverter", SymbolKind::Class),
            ]
        });
        resolver
            .expect_resolve_declaration()
            .returning(|symbol| {
                let mut descriptor = descriptor(&symbol.qualified_name);
                descriptor.package_name = "a".to_string();
                Some(descriptor)
            });
        resolver.expect_read_annotation_arguments().never();

        let processor = ConverterProcessor::new(resolver, config(true));
        let writer = MemoryArtifactWriter::new("kt");
        let err = processor.run(&writer).unwrap_err();

        match err {
            ConvgenError::ArtifactCollision { artifact, first, second } => {
                assert_eq!(artifact, "a.InnerConverterFunctions");
                assert_eq!(first, "a.InnerConverter");
                assert_eq!(second, "a.Outer.InnerConverter");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(writer.is_empty());
    }

    #[test]
    fn test_run_writes_artifacts() {
        let processor = ConverterProcessor::new(
            resolver(vec![("a.OneConverter", &["SINGLE"]), ("b.TwoConverter", &["LIST"])]),
            config(true),
        );
        let writer = MemoryArtifactWriter::new("kt");
        let report = processor.run(&writer).unwrap();

        assert_eq!(
            report.written,
            vec![
                PathBuf::from("a/OneConverterFunctions.kt"),
                PathBuf::from("b/TwoConverterFunctions.kt"),
            ]
        );
        assert!(
            writer
                .get("a/OneConverterFunctions.kt")
                .unwrap()
                .contains("fun Arguments.string(")
        );
    }

    #[test]
    fn test_inspect_reports_signatures_and_errors() {
        let processor = ConverterProcessor::new(
            resolver(vec![
                ("a.BadConverter", &["LIST", "CHOICE"]),
                ("a.GoodConverter", &["OPTIONAL", "COALESCING"]),
            ]),
            config(false),
        );
        let summaries = processor.inspect().unwrap();

        assert_eq!(summaries.len(), 2);
        assert!(summaries[0].error.as_deref().unwrap().contains("LIST and CHOICE"));
        assert_eq!(
            summaries[1].functions,
            vec!["optionalString(displayName, description, required = false, validator = null)"]
        );
        assert_eq!(summaries[1].unsupported, vec!["COALESCING"]);
        assert_eq!(summaries[1].variants, vec!["COALESCING", "OPTIONAL"]);
    }
}
