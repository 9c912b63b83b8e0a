//! Builder function synthesis.
//!
//! Each converter shape has its own synthesizer producing a [`FunctionSpec`]:
//! plain data describing the doc comment, signature and body of one builder
//! function. Text only exists after [`FunctionSpec::render`].
//!
//! The naming scheme is load-bearing: the command-argument DSL calls these
//! functions by name (`duration`, `optionalDuration`, `defaultingDurationChoice`,
//! `durationList`, ...).

mod defaulting;
mod list;
mod optional;
mod single;

use crate::code_writer::CodeWriter;
use crate::error::SpecError;
use crate::planner::list_choice_conflict;
use crate::spec::BuilderKind;
use bon::Builder;
use std::fmt;

pub const DISPLAY_NAME_PARAM: &str = "displayName";
pub const DESCRIPTION_PARAM: &str = "description";
pub const VALIDATOR_PARAM: &str = "validator";
pub const CHOICES_PARAM: &str = "choices";
pub const REQUIRED_PARAM: &str = "required";
pub const DEFAULT_VALUE_PARAM: &str = "defaultValue";

/// Names a builder is synthesized from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisContext {
    /// Simple name of the annotated converter class, e.g. `DurationConverter`.
    pub converter: String,
    /// Converter family name from the annotation, e.g. `duration`.
    pub display_name: String,
    /// Simple name of the converter's value type, e.g. `Duration`.
    pub value_type: String,
    /// Extension receiver of every builder, e.g. `Arguments`.
    pub receiver: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub ty: String,
    pub default: Option<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            default: None,
        }
    }

    pub fn with_default(
        name: impl Into<String>,
        ty: impl Into<String>,
        default: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            default: Some(default.into()),
        }
    }
}

/// Unrendered shape of one builder function.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct FunctionSpec {
    /// KDoc lines without comment markers.
    pub doc: Vec<String>,
    #[builder(into)]
    pub receiver: String,
    #[builder(into)]
    pub name: String,
    pub parameters: Vec<Parameter>,
    #[builder(into)]
    pub return_type: String,
    /// Expression body lines, unindented.
    pub body: Vec<String>,
}

impl FunctionSpec {
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Compact call shape, e.g.
    /// `optionalDuration(displayName, description, required = false, validator = null)`.
    pub fn signature(&self) -> String {
        let parameters = self
            .parameters
            .iter()
            .map(|p| match &p.default {
                Some(default) => format!("{} = {}", p.name, default),
                None => p.name.clone(),
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({})", self.name, parameters)
    }

    pub fn render<W: fmt::Write>(&self, w: &mut CodeWriter<W>) -> fmt::Result {
        w.kdoc(&self.doc)?;
        w.writeln(&format!("public fun {}.{}(", self.receiver, self.name))?;
        {
            let _indent = w.indent();
            let last = self.parameters.len().saturating_sub(1);
            for (index, parameter) in self.parameters.iter().enumerate() {
                w.write(&format!("{}: {}", parameter.name, parameter.ty))?;
                if let Some(default) = &parameter.default {
                    w.write(&format!(" = {}", default))?;
                }
                w.writeln(if index == last { "" } else { "," })?;
            }
        }
        w.writeln(&format!("): {} =", self.return_type))?;

        let _indent = w.indent();
        for line in &self.body {
            w.writeln(line)?;
        }
        Ok(())
    }

    pub fn to_source(&self) -> String {
        let mut output = String::new();
        let mut w = CodeWriter::with_indent_spaces(&mut output, 4);
        // Writing into a String cannot fail.
        let _ = self.render(&mut w);
        output
    }
}

/// Runs the synthesizer for `kind`.
///
/// `List` has no choice form; asking for one is the same configuration error
/// the planner reports.
pub fn synthesize(
    kind: BuilderKind,
    context: &SynthesisContext,
    has_choice: bool,
) -> Result<FunctionSpec, SpecError> {
    let function = match kind {
        BuilderKind::Single => single::synthesize(context, has_choice),
        BuilderKind::Optional => optional::synthesize(context, has_choice),
        BuilderKind::Defaulting => defaulting::synthesize(context, has_choice),
        BuilderKind::List if has_choice => return Err(list_choice_conflict()),
        BuilderKind::List => list::synthesize(context),
    };
    Ok(function)
}

/// First character title-cased, remainder unchanged.
///
/// Only a lowercase first character is changed. Its mapping is applied only
/// when it is a single character; otherwise the name is returned unchanged.
pub fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    if !first.is_lowercase() {
        return name.to_string();
    }

    match title_char(first) {
        Some(title) => std::iter::once(title).chain(chars).collect(),
        None => name.to_string(),
    }
}

/// Latin digraphs have a dedicated titlecase form distinct from uppercase.
fn title_char(c: char) -> Option<char> {
    match c {
        '\u{01C4}'..='\u{01C6}' => Some('\u{01C5}'),
        '\u{01C7}'..='\u{01C9}' => Some('\u{01C8}'),
        '\u{01CA}'..='\u{01CC}' => Some('\u{01CB}'),
        '\u{01F1}'..='\u{01F3}' => Some('\u{01F2}'),
        _ => {
            let mut upper = c.to_uppercase();
            match (upper.next(), upper.next()) {
                (Some(single), None) => Some(single),
                _ => None,
            }
        }
    }
}

/// First character lowercased, remainder unchanged.
pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn leading_parameters() -> Vec<Parameter> {
    vec![
        Parameter::new(DISPLAY_NAME_PARAM, "String"),
        Parameter::new(DESCRIPTION_PARAM, "String"),
    ]
}

fn choices_parameter(context: &SynthesisContext) -> Parameter {
    Parameter::new(CHOICES_PARAM, format!("Map<String, {}>", context.value_type))
}

fn validator_parameter(validated_type: &str) -> Parameter {
    Parameter::with_default(VALIDATOR_PARAM, format!("Validator<{}>", validated_type), "null")
}

/// The `arg(...)` registration every builder evaluates to.
fn registration_body(converter: String, combinator: Option<String>) -> Vec<String> {
    let mut body = vec![
        "arg(".to_string(),
        format!("    {} = {},", DISPLAY_NAME_PARAM, DISPLAY_NAME_PARAM),
        format!("    {} = {},", DESCRIPTION_PARAM, DESCRIPTION_PARAM),
        String::new(),
        format!("    converter = {}", converter),
    ];
    if let Some(combinator) = combinator {
        body.push(format!("        .{}", combinator));
    }
    body.push(")".to_string());
    body
}
