//! Converter specifications extracted from annotated declarations.

use crate::error::SpecError;
use crate::host::{
    AnnotationArguments, AnnotationValue, ConverterDescriptor, SymbolResolver, TypeRef,
};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString};
use tracing::{debug, trace, warn};

pub const NAME_ARGUMENT: &str = "name";
pub const TYPES_ARGUMENT: &str = "types";
pub const IMPORTS_ARGUMENT: &str = "imports";

/// Structural shapes a converter can be exposed as.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum VariantKind {
    Single,
    Optional,
    Defaulting,
    List,
    /// Restricts the other requested shapes to a caller-supplied set of choices.
    Choice,
}

/// Variant kinds that produce a builder function of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuilderKind {
    Single,
    Optional,
    Defaulting,
    List,
}

impl VariantKind {
    pub fn builder_kind(self) -> Option<BuilderKind> {
        match self {
            VariantKind::Single => Some(BuilderKind::Single),
            VariantKind::Optional => Some(BuilderKind::Optional),
            VariantKind::Defaulting => Some(BuilderKind::Defaulting),
            VariantKind::List => Some(BuilderKind::List),
            VariantKind::Choice => None,
        }
    }
}

/// A converter type named in the annotation's `types` argument.
///
/// Ordered by annotation name, so a `BTreeSet` iterates in the order the
/// planner processes variants.
#[derive(Debug, Clone)]
pub enum RequestedVariant {
    Supported(VariantKind),
    /// A name this generator does not know yet.
    Unsupported(String),
}

impl RequestedVariant {
    /// Accepts bare (`SINGLE`) and enum-qualified (`ConverterType.SINGLE`) names.
    pub fn parse(raw: &str) -> Self {
        let name = raw.trim();
        let name = name.rsplit('.').next().unwrap_or(name);
        match VariantKind::from_str(name) {
            Ok(kind) => RequestedVariant::Supported(kind),
            Err(_) => RequestedVariant::Unsupported(name.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            RequestedVariant::Supported(kind) => kind.as_ref(),
            RequestedVariant::Unsupported(name) => name,
        }
    }
}

impl PartialEq for RequestedVariant {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for RequestedVariant {}

impl PartialOrd for RequestedVariant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RequestedVariant {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name().cmp(other.name())
    }
}

impl fmt::Display for RequestedVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything needed to generate the builder functions of one converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterSpec {
    /// Human-readable converter family name, e.g. `duration`.
    pub name: String,
    pub value_type: TypeRef,
    pub variants: BTreeSet<RequestedVariant>,
    pub extra_imports: Vec<String>,
    pub has_choice: bool,
    pub source: ConverterDescriptor,
}

impl ConverterSpec {
    /// Simple name of the value type, as used in generated signatures.
    pub fn value_type_name(&self) -> &str {
        &self.value_type.name
    }

    /// Fully-qualified value type. Always present after extraction.
    pub fn value_type_import(&self) -> &str {
        self.value_type
            .qualified_name
            .as_deref()
            .unwrap_or(&self.value_type.name)
    }
}

/// Builds a [`ConverterSpec`] from the `annotation` on `declaration`.
pub fn extract(
    resolver: &dyn SymbolResolver,
    declaration: &ConverterDescriptor,
    annotation: &str,
) -> Result<ConverterSpec, SpecError> {
    debug!(declaration = %declaration.qualified_name, "Extracting converter spec");

    let arguments = resolver
        .read_annotation_arguments(declaration, annotation)
        .ok_or_else(|| SpecError::MissingAnnotation {
            annotation: annotation.to_string(),
        })?;

    trace!(
        "Arguments:\n{}",
        arguments
            .iter()
            .map(|(name, value)| format!("    {} : {:?}", name, value))
            .collect::<Vec<_>>()
            .join("\n")
    );

    let name = read_name(&arguments)?;
    let variants = read_types(&arguments)?;
    let extra_imports = read_imports(&arguments)?;

    for variant in &variants {
        if let RequestedVariant::Unsupported(unknown) = variant {
            warn!(
                declaration = %declaration.qualified_name,
                "Unsupported converter type {}", unknown
            );
        }
    }

    let value_type = resolver
        .resolve_first_supertype_value_type(declaration)
        .ok_or(SpecError::NoSupertype)?;
    if !value_type.is_resolved() {
        return Err(SpecError::UnresolvedValueType {
            name: value_type.name,
        });
    }

    let has_choice = variants.contains(&RequestedVariant::Supported(VariantKind::Choice));

    debug!(
        declaration = %declaration.qualified_name,
        name = %name,
        value_type = %value_type.name,
        variants = variants.len(),
        has_choice,
        "Converter spec extracted"
    );

    Ok(ConverterSpec {
        name,
        value_type,
        variants,
        extra_imports,
        has_choice,
        source: declaration.clone(),
    })
}

fn required<'a>(
    arguments: &'a AnnotationArguments,
    argument: &str,
) -> Result<&'a AnnotationValue, SpecError> {
    arguments
        .get(argument)
        .ok_or_else(|| SpecError::MissingRequiredArgument {
            argument: argument.to_string(),
        })
}

fn invalid(argument: &str, expected: &str) -> SpecError {
    SpecError::InvalidArgument {
        argument: argument.to_string(),
        expected: expected.to_string(),
    }
}

fn read_name(arguments: &AnnotationArguments) -> Result<String, SpecError> {
    let name = required(arguments, NAME_ARGUMENT)?
        .as_str()
        .ok_or_else(|| invalid(NAME_ARGUMENT, "a string"))?
        .trim();

    if name.is_empty() {
        return Err(SpecError::EmptyName);
    }
    Ok(name.to_string())
}

fn read_types(arguments: &AnnotationArguments) -> Result<BTreeSet<RequestedVariant>, SpecError> {
    let values = required(arguments, TYPES_ARGUMENT)?
        .as_list()
        .ok_or_else(|| invalid(TYPES_ARGUMENT, "a list of converter type names"))?;

    let mut variants = BTreeSet::new();
    for value in values {
        let raw = value
            .as_str()
            .filter(|raw| !raw.trim().is_empty())
            .ok_or_else(|| invalid(TYPES_ARGUMENT, "a list of converter type names"))?;
        let variant = RequestedVariant::parse(raw);
        if variant.name().is_empty() {
            return Err(invalid(TYPES_ARGUMENT, "a list of converter type names"));
        }
        variants.insert(variant);
    }

    if variants.is_empty() {
        return Err(SpecError::NoVariants);
    }
    Ok(variants)
}

fn read_imports(arguments: &AnnotationArguments) -> Result<Vec<String>, SpecError> {
    let Some(value) = arguments.get(IMPORTS_ARGUMENT) else {
        return Ok(Vec::new());
    };

    let values = value
        .as_list()
        .ok_or_else(|| invalid(IMPORTS_ARGUMENT, "a list of import paths"))?;

    values
        .iter()
        .map(|value| {
            value
                .as_str()
                .map(str::trim)
                .filter(|path| !path.is_empty())
                .map(str::to_string)
                .ok_or_else(|| invalid(IMPORTS_ARGUMENT, "a list of import paths"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MockSymbolResolver;
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    const ANNOTATION: &str = "com.example.Converter";

    fn descriptor() -> ConverterDescriptor {
        ConverterDescriptor {
            qualified_name: "com.example.DurationConverter".to_string(),
            simple_name: "DurationConverter".to_string(),
            package_name: "com.example".to_string(),
            supertypes: vec![
                TypeRef::resolved("com.example.runtime.SingleConverter")
                    .with_argument(TypeRef::resolved("java.time.Duration")),
            ],
            containing_file: None,
        }
    }

    fn strings(values: &[&str]) -> AnnotationValue {
        AnnotationValue::List(
            values
                .iter()
                .map(|v| AnnotationValue::String(v.to_string()))
                .collect(),
        )
    }

    fn resolver_with(
        arguments: Option<AnnotationArguments>,
        value_type: Option<TypeRef>,
    ) -> MockSymbolResolver {
        let mut resolver = MockSymbolResolver::new();
        resolver
            .expect_read_annotation_arguments()
            .returning(move |_, _| arguments.clone());
        resolver
            .expect_resolve_first_supertype_value_type()
            .returning(move |_| value_type.clone());
        resolver
    }

    fn arguments(name: &str, types: &[&str]) -> AnnotationArguments {
        let mut arguments = AnnotationArguments::new();
        arguments.insert(
            NAME_ARGUMENT.to_string(),
            AnnotationValue::String(name.to_string()),
        );
        arguments.insert(TYPES_ARGUMENT.to_string(), strings(types));
        arguments
    }

    fn duration() -> Option<TypeRef> {
        Some(TypeRef::resolved("java.time.Duration"))
    }

    #[test]
    fn test_variant_kind_names() {
        let names: Vec<String> = VariantKind::iter().map(|k| k.to_string()).collect();
        assert_eq!(names, vec!["SINGLE", "OPTIONAL", "DEFAULTING", "LIST", "CHOICE"]);
    }

    #[test]
    fn test_requested_variant_parse() {
        assert_eq!(
            RequestedVariant::parse("SINGLE"),
            RequestedVariant::Supported(VariantKind::Single)
        );
        assert_eq!(
            RequestedVariant::parse("ConverterType.CHOICE"),
            RequestedVariant::Supported(VariantKind::Choice)
        );
        assert!(matches!(
            RequestedVariant::parse("COALESCING"),
            RequestedVariant::Unsupported(name) if name == "COALESCING"
        ));
    }

    #[test]
    fn test_requested_variants_sort_by_name() {
        let set: BTreeSet<RequestedVariant> = [
            "SINGLE",
            "LIST",
            "COALESCING",
            "CHOICE",
            "OPTIONAL",
            "DEFAULTING",
        ]
        .iter()
        .map(|raw| RequestedVariant::parse(raw))
        .collect();
        let names: Vec<&str> = set.iter().map(RequestedVariant::name).collect();
        assert_eq!(
            names,
            vec!["CHOICE", "COALESCING", "DEFAULTING", "LIST", "OPTIONAL", "SINGLE"]
        );
    }

    #[test]
    fn test_extract_basic_spec() {
        let mut args = arguments("duration", &["SINGLE", "OPTIONAL", "SINGLE"]);
        args.insert(IMPORTS_ARGUMENT.to_string(), strings(&["a.b.C", "a.b.D"]));
        let resolver = resolver_with(Some(args), duration());

        let spec = extract(&resolver, &descriptor(), ANNOTATION).unwrap();
        assert_eq!(spec.name, "duration");
        assert_eq!(spec.value_type_name(), "Duration");
        assert_eq!(spec.value_type_import(), "java.time.Duration");
        assert_eq!(spec.variants.len(), 2);
        assert_eq!(spec.extra_imports, vec!["a.b.C", "a.b.D"]);
        assert!(!spec.has_choice);
    }

    #[test]
    fn test_extract_records_choice() {
        let resolver = resolver_with(
            Some(arguments("color", &["CHOICE", "SINGLE"])),
            duration(),
        );
        let spec = extract(&resolver, &descriptor(), ANNOTATION).unwrap();
        assert!(spec.has_choice);
    }

    #[test]
    fn test_extract_without_annotation() {
        let resolver = resolver_with(None, duration());
        assert_eq!(
            extract(&resolver, &descriptor(), ANNOTATION).unwrap_err(),
            SpecError::MissingAnnotation {
                annotation: ANNOTATION.to_string()
            }
        );
    }

    #[test]
    fn test_extract_missing_name() {
        let mut args = arguments("duration", &["SINGLE"]);
        args.remove(NAME_ARGUMENT);
        let resolver = resolver_with(Some(args), duration());
        assert_eq!(
            extract(&resolver, &descriptor(), ANNOTATION).unwrap_err(),
            SpecError::MissingRequiredArgument {
                argument: "name".to_string()
            }
        );
    }

    #[test]
    fn test_extract_missing_types() {
        let mut args = arguments("duration", &["SINGLE"]);
        args.remove(TYPES_ARGUMENT);
        let resolver = resolver_with(Some(args), duration());
        assert_eq!(
            extract(&resolver, &descriptor(), ANNOTATION).unwrap_err(),
            SpecError::MissingRequiredArgument {
                argument: "types".to_string()
            }
        );
    }

    #[test]
    fn test_extract_rejects_wrongly_typed_arguments() {
        let mut args = arguments("duration", &["SINGLE"]);
        args.insert(NAME_ARGUMENT.to_string(), AnnotationValue::Integer(3));
        let resolver = resolver_with(Some(args), duration());
        assert!(matches!(
            extract(&resolver, &descriptor(), ANNOTATION).unwrap_err(),
            SpecError::InvalidArgument { argument, .. } if argument == "name"
        ));

        let mut args = arguments("duration", &["SINGLE"]);
        args.insert(
            IMPORTS_ARGUMENT.to_string(),
            AnnotationValue::String("a.b.C".to_string()),
        );
        let resolver = resolver_with(Some(args), duration());
        assert!(matches!(
            extract(&resolver, &descriptor(), ANNOTATION).unwrap_err(),
            SpecError::InvalidArgument { argument, .. } if argument == "imports"
        ));
    }

    #[test]
    fn test_extract_empty_values() {
        let resolver = resolver_with(Some(arguments("  ", &["SINGLE"])), duration());
        assert_eq!(
            extract(&resolver, &descriptor(), ANNOTATION).unwrap_err(),
            SpecError::EmptyName
        );

        let resolver = resolver_with(Some(arguments("duration", &[])), duration());
        assert_eq!(
            extract(&resolver, &descriptor(), ANNOTATION).unwrap_err(),
            SpecError::NoVariants
        );
    }

    #[test]
    fn test_extract_rejects_qualifier_without_type_name() {
        let resolver = resolver_with(
            Some(arguments("duration", &["SINGLE", "ConverterType."])),
            duration(),
        );
        assert!(matches!(
            extract(&resolver, &descriptor(), ANNOTATION).unwrap_err(),
            SpecError::InvalidArgument { argument, .. } if argument == "types"
        ));
    }

    #[test]
    fn test_extract_without_value_type() {
        let resolver = resolver_with(Some(arguments("duration", &["SINGLE"])), None);
        assert_eq!(
            extract(&resolver, &descriptor(), ANNOTATION).unwrap_err(),
            SpecError::NoSupertype
        );

        let resolver = resolver_with(
            Some(arguments("duration", &["SINGLE"])),
            Some(TypeRef::unresolved("Duration")),
        );
        assert_eq!(
            extract(&resolver, &descriptor(), ANNOTATION).unwrap_err(),
            SpecError::UnresolvedValueType {
                name: "Duration".to_string()
            }
        );
    }
}
