//! Decides which builder functions a converter spec produces.

use crate::error::SpecError;
use crate::spec::{BuilderKind, ConverterSpec, RequestedVariant, VariantKind};
use tracing::{debug, trace};

/// One entry of a converter's generation plan, in planner order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedVariant {
    /// Synthesize one builder function.
    Function { kind: BuilderKind, has_choice: bool },
    /// `CHOICE` itself; consumed by the other entries, emits nothing.
    ChoiceModifier,
    /// A converter type this generator does not implement.
    Unsupported(String),
}

impl PlannedVariant {
    pub fn is_function(&self) -> bool {
        matches!(self, PlannedVariant::Function { .. })
    }
}

pub(crate) fn list_choice_conflict() -> SpecError {
    SpecError::IncompatibleVariants {
        first: VariantKind::List.to_string(),
        second: VariantKind::Choice.to_string(),
        reason: "there are no list-based choice converters".to_string(),
    }
}

/// Plans `spec` in lexicographic variant-name order.
///
/// Fails as a whole when `LIST` and `CHOICE` are both requested, so no partial
/// artifact can be produced for the declaration.
pub fn plan(spec: &ConverterSpec) -> Result<Vec<PlannedVariant>, SpecError> {
    let mut planned = Vec::with_capacity(spec.variants.len());

    for variant in &spec.variants {
        trace!(declaration = %spec.source.qualified_name, "Current type: {}", variant);

        let entry = match variant {
            RequestedVariant::Supported(kind) => match kind.builder_kind() {
                None => PlannedVariant::ChoiceModifier,
                Some(BuilderKind::List) if spec.has_choice => return Err(list_choice_conflict()),
                Some(kind) => PlannedVariant::Function {
                    kind,
                    has_choice: spec.has_choice,
                },
            },
            RequestedVariant::Unsupported(name) => PlannedVariant::Unsupported(name.clone()),
        };
        planned.push(entry);
    }

    debug!(
        declaration = %spec.source.qualified_name,
        functions = planned.iter().filter(|p| p.is_function()).count(),
        "Planned converter variants"
    );
    Ok(planned)
}
