mod common;

use common::{config, converter, index};
use convgen_core::tooling::ConverterProcessor;
use proptest::prelude::*;

const TYPES: [&str; 6] = ["SINGLE", "OPTIONAL", "DEFAULTING", "LIST", "CHOICE", "COALESCING"];

fn generate(types: &[&str]) -> Option<String> {
    let report = ConverterProcessor::new(
        index(vec![converter(
            "com.example.converters.SnowflakeConverter",
            "dev.kord.common.entity.Snowflake",
            "snowflake",
            types,
            &["dev.kord.common.entity.Snowflake"],
        )]),
        config(),
    )
    .process()
    .ok()?;
    report.artifacts.first().map(|artifact| artifact.text.clone())
}

proptest! {
    #[test]
    fn permuting_types_does_not_change_output(
        selection in proptest::sample::subsequence(TYPES.to_vec(), 1..=TYPES.len()),
        seed in any::<u64>(),
    ) {
        let mut shuffled = selection.clone();
        // Deterministic rotation plus reversal, driven by the seed.
        let len = shuffled.len();
        shuffled.rotate_left((seed as usize) % len);
        if seed % 2 == 0 {
            shuffled.reverse();
        }

        prop_assert_eq!(generate(&selection), generate(&shuffled));
    }

    #[test]
    fn duplicate_types_collapse(
        selection in proptest::sample::subsequence(TYPES.to_vec(), 1..=TYPES.len()),
    ) {
        let mut doubled = selection.clone();
        doubled.extend(selection.iter().copied());
        prop_assert_eq!(generate(&selection), generate(&doubled));
    }
}

#[test]
fn test_emit_is_byte_identical_across_runs() {
    let types = ["SINGLE", "OPTIONAL", "DEFAULTING", "LIST"];
    assert_eq!(generate(&types), generate(&types));
    assert!(generate(&types).is_some());
}
