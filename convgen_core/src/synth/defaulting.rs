use super::{
    DEFAULT_VALUE_PARAM, FunctionSpec, Parameter, SynthesisContext, choices_parameter,
    leading_parameters, registration_body, title_case, validator_parameter,
};

/// `defaultingDuration(...)` / `defaultingDurationChoice(...)`.
pub(super) fn synthesize(context: &SynthesisContext, has_choice: bool) -> FunctionSpec {
    let mut parameters = leading_parameters();
    parameters.push(Parameter::new(DEFAULT_VALUE_PARAM, &context.value_type));

    let base_name = format!("defaulting{}", title_case(&context.display_name));
    let (name, summary, converter) = if has_choice {
        parameters.push(choices_parameter(context));
        (
            format!("{}Choice", base_name),
            format!(
                "Creates a defaulting {} choice converter, for a defined set of single arguments.",
                context.display_name
            ),
            format!("{}(choices)", context.converter),
        )
    } else {
        (
            base_name,
            format!(
                "Creates a defaulting {} converter, for single arguments.",
                context.display_name
            ),
            format!("{}()", context.converter),
        )
    };

    parameters.push(validator_parameter(&context.value_type));

    FunctionSpec::builder()
        .doc(vec![
            summary,
            String::new(),
            "@param defaultValue Default value to use if no argument was provided.".to_string(),
            format!("@see {}", context.converter),
        ])
        .receiver(&context.receiver)
        .name(name)
        .parameters(parameters)
        .return_type(format!("DefaultingConverter<{}>", context.value_type))
        .body(registration_body(
            converter,
            Some("toDefaulting(defaultValue, nestedValidator = validator)".to_string()),
        ))
        .build()
}
