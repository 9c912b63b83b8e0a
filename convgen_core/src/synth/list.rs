use super::{
    FunctionSpec, Parameter, REQUIRED_PARAM, SynthesisContext, leading_parameters, lower_first,
    registration_body, validator_parameter,
};

/// `durationList(...)`. There is no choice form.
pub(super) fn synthesize(context: &SynthesisContext) -> FunctionSpec {
    let mut parameters = leading_parameters();
    parameters.push(Parameter::with_default(REQUIRED_PARAM, "Boolean", "true"));
    parameters.push(validator_parameter(&format!("List<{}>", context.value_type)));

    FunctionSpec::builder()
        .doc(vec![
            format!(
                "Creates a {} converter, for lists of arguments.",
                context.display_name
            ),
            String::new(),
            "@param required Whether command parsing should fail if no arguments could be converted."
                .to_string(),
            format!("@see {}", context.converter),
        ])
        .receiver(&context.receiver)
        .name(format!("{}List", lower_first(&context.display_name)))
        .parameters(parameters)
        .return_type(format!("MultiConverter<{}>", context.value_type))
        .body(registration_body(
            format!("{}()", context.converter),
            Some("toMulti(required, nestedValidator = validator)".to_string()),
        ))
        .build()
}
