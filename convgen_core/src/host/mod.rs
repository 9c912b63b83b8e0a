//! Read-only view of the host compiler's symbol graph.
//!
//! The generator never resolves types itself. Everything it knows about a
//! declaration comes through [`SymbolResolver`], which a host implements over
//! its own (already validated) resolution graph. [`SymbolIndex`] is the
//! file-backed implementation used by the CLI.

mod index;

pub use index::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// What kind of declaration an annotated symbol is.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    #[default]
    Class,
    Object,
    Interface,
    Function,
    Property,
}

/// Opaque handle for an annotated symbol, as returned by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol {
    pub qualified_name: String,
    pub kind: SymbolKind,
}

impl Symbol {
    pub fn new(qualified_name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            kind,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name)
    }
}

/// A reference to a type as the host resolved it.
///
/// `qualified_name` is `None` when the host could not resolve the type in the
/// current pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualified_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<TypeRef>,
}

impl TypeRef {
    pub fn resolved(qualified_name: impl Into<String>) -> Self {
        let qualified_name = qualified_name.into();
        let name = qualified_name
            .rsplit('.')
            .next()
            .unwrap_or(&qualified_name)
            .to_string();
        Self {
            name,
            qualified_name: Some(qualified_name),
            arguments: Vec::new(),
        }
    }

    pub fn unresolved(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qualified_name: None,
            arguments: Vec::new(),
        }
    }

    pub fn with_argument(mut self, argument: TypeRef) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn is_resolved(&self) -> bool {
        self.qualified_name.is_some()
    }

    /// True when this type and every type argument below it are resolved.
    pub fn is_fully_resolved(&self) -> bool {
        self.is_resolved() && self.arguments.iter().all(TypeRef::is_fully_resolved)
    }
}

/// An annotated class declaration whose type graph the host fully resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterDescriptor {
    pub qualified_name: String,
    pub simple_name: String,
    pub package_name: String,
    pub supertypes: Vec<TypeRef>,
    pub containing_file: Option<PathBuf>,
}

impl ConverterDescriptor {
    /// Name of the artifact generated for this declaration.
    pub fn artifact_base_name(&self) -> String {
        format!("{}Functions", self.simple_name)
    }

    /// Package-qualified artifact identity, used for collision detection.
    pub fn artifact_identity(&self) -> String {
        if self.package_name.is_empty() {
            self.artifact_base_name()
        } else {
            format!("{}.{}", self.package_name, self.artifact_base_name())
        }
    }
}

/// A single annotation argument value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnnotationValue {
    Bool(bool),
    Integer(i64),
    String(String),
    List(Vec<AnnotationValue>),
}

impl AnnotationValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnnotationValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[AnnotationValue]> {
        match self {
            AnnotationValue::List(values) => Some(values),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            AnnotationValue::Bool(_) => "boolean",
            AnnotationValue::Integer(_) => "integer",
            AnnotationValue::String(_) => "string",
            AnnotationValue::List(_) => "list",
        }
    }
}

/// Named arguments of one annotation occurrence.
pub type AnnotationArguments = BTreeMap<String, AnnotationValue>;

/// Narrow query interface onto the host environment.
///
/// Implementations must be safe for concurrent reads: the processor queries
/// declarations from several worker threads at once.
#[cfg_attr(test, mockall::automock)]
pub trait SymbolResolver: Send + Sync {
    /// All symbols carrying the annotation with the given qualified name.
    fn symbols_with_annotation(&self, annotation: &str) -> Vec<Symbol>;

    /// The declaration behind `symbol`, or `None` if its type graph cannot be
    /// fully resolved in this pass.
    fn resolve_declaration(&self, symbol: &Symbol) -> Option<ConverterDescriptor>;

    /// Arguments of the given annotation on the declaration, if present.
    fn read_annotation_arguments(
        &self,
        declaration: &ConverterDescriptor,
        annotation: &str,
    ) -> Option<AnnotationArguments>;

    /// First type argument of the declaration's first supertype.
    fn resolve_first_supertype_value_type(
        &self,
        declaration: &ConverterDescriptor,
    ) -> Option<TypeRef> {
        declaration
            .supertypes
            .first()
            .and_then(|supertype| supertype.arguments.first())
            .cloned()
    }
}
