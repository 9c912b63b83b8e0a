use super::{
    FunctionSpec, Parameter, REQUIRED_PARAM, SynthesisContext, choices_parameter,
    leading_parameters, registration_body, title_case, validator_parameter,
};

/// `optionalDuration(...)` / `optionalDurationChoice(...)`.
///
/// Only the plain form exposes `required`; it maps onto the combinator's
/// `outputError` flag.
pub(super) fn synthesize(context: &SynthesisContext, has_choice: bool) -> FunctionSpec {
    let mut parameters = leading_parameters();
    let base_name = format!("optional{}", title_case(&context.display_name));

    let (name, doc, converter, combinator) = if has_choice {
        parameters.push(choices_parameter(context));
        (
            format!("{}Choice", base_name),
            vec![
                format!(
                    "Creates an optional {} choice converter, for a defined set of single arguments.",
                    context.display_name
                ),
                String::new(),
                format!("@see {}", context.converter),
            ],
            format!("{}(choices)", context.converter),
            "toOptional(nestedValidator = validator)".to_string(),
        )
    } else {
        parameters.push(Parameter::with_default(REQUIRED_PARAM, "Boolean", "false"));
        (
            base_name,
            vec![
                format!(
                    "Creates an optional {} converter, for single arguments.",
                    context.display_name
                ),
                String::new(),
                "@param required Whether command parsing should fail if an invalid argument is provided."
                    .to_string(),
                format!("@see {}", context.converter),
            ],
            format!("{}()", context.converter),
            "toOptional(outputError = required, nestedValidator = validator)".to_string(),
        )
    };

    let nullable = format!("{}?", context.value_type);
    parameters.push(validator_parameter(&nullable));

    FunctionSpec::builder()
        .doc(doc)
        .receiver(&context.receiver)
        .name(name)
        .parameters(parameters)
        .return_type(format!("OptionalConverter<{}>", nullable))
        .body(registration_body(converter, Some(combinator)))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::tests::context;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_optional() {
        let function = synthesize(&context(), false);
        assert_eq!(
            function.signature(),
            "optionalDuration(displayName, description, required = false, validator = null)"
        );
        assert_eq!(function.return_type, "OptionalConverter<Duration?>");
        assert_eq!(function.parameter("validator").unwrap().ty, "Validator<Duration?>");
        assert!(function.doc.iter().any(|line| line.starts_with("@param required")));
    }

    #[test]
    fn test_choice_optional_drops_required() {
        let function = synthesize(&context(), true);
        assert_eq!(
            function.signature(),
            "optionalDurationChoice(displayName, description, choices, validator = null)"
        );
        assert!(function.parameter("required").is_none());
        assert!(
            function
                .body
                .contains(&"        .toOptional(nestedValidator = validator)".to_string())
        );
        assert!(
            function
                .body
                .contains(&"    converter = DurationConverter(choices)".to_string())
        );
    }
}
