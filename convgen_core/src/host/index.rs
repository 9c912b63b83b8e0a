//! File-backed symbol index.
//!
//! A host compiler plugin exports the declarations it resolved into
//! `*.symbols.toml` or `*.symbols.json` files. Unresolved types are written
//! without a `qualified_name`; declarations that reference one are reported as
//! deferred by the scanner.

use super::{
    AnnotationArguments, ConverterDescriptor, Symbol, SymbolKind, SymbolResolver, TypeRef,
};
use crate::error::{ConvgenError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};
use walkdir::WalkDir;

static QUALIFIED_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$")
        .expect("Invalid qualified name regex")
});

pub const TOML_INDEX_SUFFIX: &str = ".symbols.toml";
pub const JSON_INDEX_SUFFIX: &str = ".symbols.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFormat {
    Toml,
    Json,
}

impl IndexFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        if name.ends_with(".toml") {
            Some(IndexFormat::Toml)
        } else if name.ends_with(".json") {
            Some(IndexFormat::Json)
        } else {
            None
        }
    }
}

/// One declaration as exported by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclarationEntry {
    pub qualified_name: String,
    #[serde(default)]
    pub package: String,
    #[serde(default)]
    pub kind: SymbolKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub supertypes: Vec<TypeRef>,
    #[serde(default)]
    pub annotations: Vec<AnnotationEntry>,
}

impl DeclarationEntry {
    /// Declared name relative to its package. Nested declarations keep only
    /// their innermost name.
    pub fn simple_name(&self) -> &str {
        self.qualified_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.qualified_name)
    }

    fn has_annotation(&self, annotation: &str) -> bool {
        self.annotations
            .iter()
            .any(|entry| entry.qualified_name == annotation)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationEntry {
    pub qualified_name: String,
    #[serde(default)]
    pub arguments: AnnotationArguments,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct IndexFile {
    #[serde(default, rename = "declaration")]
    declarations: Vec<DeclarationEntry>,
}

/// In-memory symbol index keyed by qualified name.
#[derive(Debug, Default, Clone)]
pub struct SymbolIndex {
    declarations: BTreeMap<String, DeclarationEntry>,
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_declarations(
        declarations: impl IntoIterator<Item = DeclarationEntry>,
    ) -> Result<Self> {
        let mut index = Self::new();
        for declaration in declarations {
            index.insert(declaration, Path::new("<memory>"))?;
        }
        Ok(index)
    }

    /// Loads a single index file, or every index file below a directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConvgenError::InvalidPath {
                path: path.to_path_buf(),
            });
        }

        let mut index = Self::new();
        if path.is_dir() {
            info!("Scanning {:?} for symbol index files", path);
            for file in Self::index_files(path)? {
                index.load_file(&file)?;
            }
        } else {
            index.load_file(path)?;
        }

        info!(
            declarations = index.declarations.len(),
            "Symbol index loaded"
        );
        Ok(index)
    }

    /// Index files below `root`, in file-name order.
    pub fn index_files(root: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| ConvgenError::workspace_scan(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if name.ends_with(TOML_INDEX_SUFFIX) || name.ends_with(JSON_INDEX_SUFFIX) {
                trace!("Found index file {:?}", entry.path());
                files.push(entry.into_path());
            }
        }
        debug!("Found {} index files below {:?}", files.len(), root);
        Ok(files)
    }

    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let format = IndexFormat::from_path(path).ok_or_else(|| {
            ConvgenError::index(path, "expected a .toml or .json symbol index")
        })?;
        let content = fs::read_to_string(path)?;
        self.merge_str(&content, format, path)
    }

    /// Parses index content and merges its declarations into this index.
    pub fn merge_str(&mut self, content: &str, format: IndexFormat, origin: &Path) -> Result<()> {
        let file: IndexFile = match format {
            IndexFormat::Toml => toml::from_str(content)
                .map_err(|e| ConvgenError::index(origin, e.to_string()))?,
            IndexFormat::Json => serde_json::from_str(content)
                .map_err(|e| ConvgenError::index(origin, e.to_string()))?,
        };

        debug!(
            "Loaded {} declarations from {:?}",
            file.declarations.len(),
            origin
        );
        for declaration in file.declarations {
            self.insert(declaration, origin)?;
        }
        Ok(())
    }

    fn insert(&mut self, declaration: DeclarationEntry, origin: &Path) -> Result<()> {
        if !QUALIFIED_NAME_RE.is_match(&declaration.qualified_name) {
            return Err(ConvgenError::index(
                origin,
                format!("invalid qualified name '{}'", declaration.qualified_name),
            ));
        }

        if !declaration.package.is_empty()
            && !declaration
                .qualified_name
                .starts_with(&format!("{}.", declaration.package))
        {
            return Err(ConvgenError::index(
                origin,
                format!(
                    "declaration '{}' is not inside package '{}'",
                    declaration.qualified_name, declaration.package
                ),
            ));
        }

        if self.declarations.contains_key(&declaration.qualified_name) {
            return Err(ConvgenError::index(
                origin,
                format!(
                    "declaration '{}' is listed more than once",
                    declaration.qualified_name
                ),
            ));
        }

        self.declarations
            .insert(declaration.qualified_name.clone(), declaration);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn get(&self, qualified_name: &str) -> Option<&DeclarationEntry> {
        self.declarations.get(qualified_name)
    }
}

impl SymbolResolver for SymbolIndex {
    fn symbols_with_annotation(&self, annotation: &str) -> Vec<Symbol> {
        self.declarations
            .values()
            .filter(|declaration| declaration.has_annotation(annotation))
            .map(|declaration| Symbol::new(&declaration.qualified_name, declaration.kind))
            .collect()
    }

    fn resolve_declaration(&self, symbol: &Symbol) -> Option<ConverterDescriptor> {
        let declaration = self.get(&symbol.qualified_name)?;

        if let Some(unresolved) = declaration
            .supertypes
            .iter()
            .find(|supertype| !supertype.is_fully_resolved())
        {
            trace!(
                "{} references unresolved type {}",
                declaration.qualified_name, unresolved.name
            );
            return None;
        }

        Some(ConverterDescriptor {
            qualified_name: declaration.qualified_name.clone(),
            simple_name: declaration.simple_name().to_string(),
            package_name: declaration.package.clone(),
            supertypes: declaration.supertypes.clone(),
            containing_file: declaration.file.clone(),
        })
    }

    fn read_annotation_arguments(
        &self,
        declaration: &ConverterDescriptor,
        annotation: &str,
    ) -> Option<AnnotationArguments> {
        self.get(&declaration.qualified_name)?
            .annotations
            .iter()
            .find(|entry| entry.qualified_name == annotation)
            .map(|entry| entry.arguments.clone())
    }
}
