use proptest::prelude::*;
use std::collections::BTreeMap;

use fairy_core::domain::aggregate::{from_outcome, level_for, normalize_samples};
use fairy_core::domain::checks::Tables;
use fairy_core::domain::report::{Level, MAX_SAMPLES, Sample};
use fairy_core::domain::{Rule, Severity, Table};
use fairy_core::CheckRegistry;

fn sample() -> impl Strategy<Value = Sample> {
    (
        proptest::option::of(0usize..50),
        proptest::option::of("[a-c]{1,2}"),
        proptest::option::of("[0-9x]{0,3}"),
    )
        .prop_map(|(row, column, value)| {
            let mut s = match row {
                Some(r) => Sample::at_row(r),
                None => Sample::default(),
            };
            if let Some(c) = column {
                s = s.column(c);
            }
            if let Some(v) = value {
                s = s.value(v);
            }
            s
        })
}

fn severity() -> impl Strategy<Value = Severity> {
    prop_oneof![Just(Severity::Warn), Just(Severity::Fail)]
}

/// A one-column table of short, often repeated or blank, cells.
fn column_cells() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(prop_oneof![Just(String::new()), "[a-d]", "-?[0-9]{1,2}"], 0..40)
}

fn tables(cells: &[String]) -> Tables {
    let rows: Vec<Vec<String>> = cells.iter().map(|c| vec![c.clone()]).collect();
    let mut t = BTreeMap::new();
    t.insert("t".to_string(), Table::new(vec!["c".to_string()], rows));
    t
}

fn data_rules(severity: Severity) -> Vec<Rule> {
    vec![
        Rule::new("req", "required", severity).with("column", "c"),
        Rule::new("uniq", "unique", severity).with("column", "c"),
        Rule::new("range", "range", severity)
            .with("column", "c")
            .with("min", 0)
            .with("max", 9),
        Rule::new("enum", "enum", severity)
            .with("column", "c")
            .with("allow", serde_json::json!(["a", "b"])),
        Rule::new("nonempty", "non_empty_trimmed", severity).with("column", "c"),
    ]
}

proptest! {
    #[test]
    fn prop_sample_ordering_is_idempotent(mut samples in proptest::collection::vec(sample(), 0..30)) {
        normalize_samples(&mut samples);
        let once = samples.clone();
        normalize_samples(&mut samples);
        prop_assert_eq!(once, samples);
    }

    #[test]
    fn prop_level_pass_iff_zero_count(count in 0usize..5, severity in severity()) {
        let level = level_for(count, severity);
        prop_assert_eq!(level == Level::Pass, count == 0);
    }

    #[test]
    fn prop_data_findings_respect_contract(cells in column_cells(), severity in severity()) {
        let registry = CheckRegistry::builtin();
        let tables = tables(&cells);

        for rule in data_rules(severity) {
            let outcome = registry.evaluate(&rule, &tables);
            prop_assert!(outcome.is_ok(), "rule {} errored: {:?}", rule.id, outcome);
            let result = from_outcome(&rule, outcome.unwrap_or_default());

            prop_assert_eq!(result.level == Level::Pass, result.count == 0);
            prop_assert!(result.samples.len() <= result.count.min(MAX_SAMPLES));
            // severity containment: a data finding never escalates
            prop_assert!(result.level == Level::Pass || result.level == severity.level());

            let mut resorted = result.samples.clone();
            normalize_samples(&mut resorted);
            prop_assert_eq!(&resorted, &result.samples);
        }
    }
}
