//! Finds the annotated declarations a run will process.

use crate::host::{ConverterDescriptor, Symbol, SymbolKind, SymbolResolver};
use tracing::{debug, info, warn};

/// Result of one scan, every list ordered by qualified name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Class declarations whose type graph resolved in this pass.
    pub valid: Vec<ConverterDescriptor>,
    /// Declarations that could not be resolved yet; the host retries them.
    pub deferred: Vec<Symbol>,
    /// Annotated symbols that are not class declarations.
    pub ignored: Vec<Symbol>,
}

impl ScanOutcome {
    pub fn is_empty(&self) -> bool {
        self.valid.is_empty() && self.deferred.is_empty() && self.ignored.is_empty()
    }
}

/// Partitions every symbol annotated with `annotation`.
pub fn scan(resolver: &dyn SymbolResolver, annotation: &str) -> ScanOutcome {
    let mut symbols = resolver.symbols_with_annotation(annotation);
    symbols.sort();
    symbols.dedup();

    let mut outcome = ScanOutcome::default();
    for symbol in symbols {
        if symbol.kind != SymbolKind::Class {
            warn!(
                symbol = %symbol,
                kind = ?symbol.kind,
                "Converter annotation is only supported on classes, ignoring"
            );
            outcome.ignored.push(symbol);
            continue;
        }

        match resolver.resolve_declaration(&symbol) {
            Some(descriptor) => {
                debug!(declaration = %descriptor.qualified_name, "Found converter declaration");
                outcome.valid.push(descriptor);
            }
            None => {
                warn!(symbol = %symbol, "Unable to validate symbol, deferring to the next pass");
                outcome.deferred.push(symbol);
            }
        }
    }

    outcome
        .valid
        .sort_by(|a, b| a.qualified_name.cmp(&b.qualified_name));

    info!(
        valid = outcome.valid.len(),
        deferred = outcome.deferred.len(),
        ignored = outcome.ignored.len(),
        "Scanned converter declarations"
    );
    outcome
}
