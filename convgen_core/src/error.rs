use std::path::PathBuf;
use thiserror::Error;

/// Problems with a single annotated declaration.
///
/// These are fatal for the declaration they belong to and never for the run:
/// the processor records them against the declaration and moves on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    #[error("declaration is not annotated with {annotation}")]
    MissingAnnotation { annotation: String },

    #[error("missing required annotation argument '{argument}'")]
    MissingRequiredArgument { argument: String },

    #[error("invalid annotation argument '{argument}': expected {expected}")]
    InvalidArgument { argument: String, expected: String },

    #[error("annotation argument 'name' must not be empty")]
    EmptyName,

    #[error("annotation argument 'types' must name at least one converter type")]
    NoVariants,

    #[error(
        "no supertype carrying a value type argument; converters must declare their value type as the first type argument of their first supertype"
    )]
    NoSupertype,

    #[error("value type '{name}' could not be resolved")]
    UnresolvedValueType { name: String },

    #[error("converter types {first} and {second} cannot be combined: {reason}")]
    IncompatibleVariants {
        first: String,
        second: String,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum ConvgenError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration file convgen.toml not found (searched upward from {search_start:?})")]
    ConfigNotFound { search_start: PathBuf },

    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    #[error("Invalid path: {path}")]
    InvalidPath { path: PathBuf },

    #[error("Invalid symbol index {file}: {message}")]
    Index { file: PathBuf, message: String },

    #[error("Workspace scan error: {0}")]
    WorkspaceScan(String),

    #[error("{declaration}: {source}")]
    Spec {
        declaration: String,
        #[source]
        source: SpecError,
    },

    #[error(
        "artifact {artifact} would be generated by both {first} and {second}; rename one of the declarations"
    )]
    ArtifactCollision {
        artifact: String,
        first: String,
        second: String,
    },
}

pub type Result<T> = std::result::Result<T, ConvgenError>;

impl ConvgenError {
    pub fn config(message: impl Into<String>) -> Self {
        ConvgenError::Config(message.into())
    }

    pub fn index(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConvgenError::Index {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn workspace_scan(message: impl Into<String>) -> Self {
        ConvgenError::WorkspaceScan(message.into())
    }

    pub fn spec(declaration: impl Into<String>, source: SpecError) -> Self {
        ConvgenError::Spec {
            declaration: declaration.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_error_carries_declaration_identity() {
        let err = ConvgenError::spec(
            "com.example.ColorConverter",
            SpecError::MissingRequiredArgument {
                argument: "types".to_string(),
            },
        );
        assert_eq!(
            err.to_string(),
            "com.example.ColorConverter: missing required annotation argument 'types'"
        );
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(
            source.as_deref(),
            Some("missing required annotation argument 'types'")
        );
    }
}
