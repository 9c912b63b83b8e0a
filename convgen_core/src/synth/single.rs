use super::{
    FunctionSpec, SynthesisContext, choices_parameter, leading_parameters, lower_first,
    registration_body, validator_parameter,
};

/// `duration(...)` / `durationChoice(...)`: a required single value.
///
/// The converter takes the validator directly; there is no combinator step.
pub(super) fn synthesize(context: &SynthesisContext, has_choice: bool) -> FunctionSpec {
    let mut parameters = leading_parameters();

    let (name, summary, converter) = if has_choice {
        parameters.push(choices_parameter(context));
        (
            format!("{}Choice", lower_first(&context.display_name)),
            format!(
                "Creates a {} choice converter, for a defined set of single arguments.",
                context.display_name
            ),
            format!("{}(choices, validator)", context.converter),
        )
    } else {
        (
            lower_first(&context.display_name),
            format!(
                "Creates a {} converter, for single arguments.",
                context.display_name
            ),
            format!("{}(validator)", context.converter),
        )
    };

    parameters.push(validator_parameter(&context.value_type));

    FunctionSpec::builder()
        .doc(vec![
            summary,
            String::new(),
            format!("@see {}", context.converter),
        ])
        .receiver(&context.receiver)
        .name(name)
        .parameters(parameters)
        .return_type(format!("SingleConverter<{}>", context.value_type))
        .body(registration_body(converter, None))
        .build()
}
