#![allow(dead_code)]

use convgen_core::config::ConvgenConfig;
use convgen_core::host::{
    AnnotationArguments, AnnotationEntry, AnnotationValue, DeclarationEntry, SymbolIndex,
    SymbolKind, TypeRef,
};

pub const ANNOTATION: &str =
    "com.kotlindiscord.kord.extensions.modules.annotations.converters.Converter";

pub fn converter(
    qualified_name: &str,
    value_type: &str,
    name: &str,
    types: &[&str],
    imports: &[&str],
) -> DeclarationEntry {
    let package = qualified_name
        .rsplit_once('.')
        .map(|(package, _)| package.to_string())
        .unwrap_or_default();

    let mut arguments = AnnotationArguments::new();
    arguments.insert("name".to_string(), AnnotationValue::String(name.to_string()));
    arguments.insert("types".to_string(), strings(types));
    if !imports.is_empty() {
        arguments.insert("imports".to_string(), strings(imports));
    }

    DeclarationEntry {
        qualified_name: qualified_name.to_string(),
        package,
        kind: SymbolKind::Class,
        file: None,
        supertypes: vec![
            TypeRef::resolved("com.kotlindiscord.kord.extensions.commands.converters.SingleConverter")
                .with_argument(TypeRef::resolved(value_type)),
        ],
        annotations: vec![AnnotationEntry {
            qualified_name: ANNOTATION.to_string(),
            arguments,
        }],
    }
}

fn strings(values: &[&str]) -> AnnotationValue {
    AnnotationValue::List(
        values
            .iter()
            .map(|value| AnnotationValue::String(value.to_string()))
            .collect(),
    )
}

pub fn index(declarations: Vec<DeclarationEntry>) -> SymbolIndex {
    SymbolIndex::from_declarations(declarations).expect("valid test index")
}

pub fn config() -> ConvgenConfig {
    ConvgenConfig::builder().annotation(ANNOTATION).build()
}
