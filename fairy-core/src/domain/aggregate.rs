// fairy-core/src/domain/aggregate.rs
//
// Turns raw check outcomes into report results and the run summary.

use serde_json::Value;

use crate::domain::checks::{CheckError, Outcome};
use crate::domain::report::{Level, MAX_SAMPLES, ResultMeta, RuleResult, Sample, Summary};
use crate::domain::rulepack::{Rule, Severity};

/// `pass` when nothing was found, otherwise the rule's declared severity.
pub fn level_for(count: usize, severity: Severity) -> Level {
    if count == 0 {
        Level::Pass
    } else {
        severity.level()
    }
}

/// Stable order, then keep at most `MAX_SAMPLES`. Applying it twice is a no-op.
pub fn normalize_samples(samples: &mut Vec<Sample>) {
    samples.sort_by(Sample::sort_cmp);
    samples.truncate(MAX_SAMPLES);
}

/// Result for a rule whose check ran to completion.
pub fn from_outcome(rule: &Rule, outcome: Outcome) -> RuleResult {
    let Outcome {
        count,
        mut samples,
        meta,
    } = outcome;
    normalize_samples(&mut samples);
    samples.truncate(count);

    RuleResult {
        rule: rule.id.clone(),
        level: level_for(count, rule.severity),
        count,
        samples,
        meta: (!meta.is_empty()).then_some(meta),
    }
}

/// Synthetic result for a rule that could not be evaluated. Always `fail`,
/// whatever the declared severity: a broken rule must block submission.
pub fn from_error(rule: &Rule, error: &CheckError) -> RuleResult {
    let mut meta = ResultMeta::new();
    let (input, column) = match error {
        CheckError::ColumnNotFound { input, column } => (Some(input.as_str()), Some(column.as_str())),
        _ => (rule.input(), rule.column()),
    };
    if let Some(input) = input {
        meta.insert("input".into(), Value::String(input.to_string()));
    }
    if let Some(column) = column {
        meta.insert("column".into(), Value::String(column.to_string()));
    }
    meta.insert("error".into(), Value::String(error.code().to_string()));
    meta.insert("message".into(), Value::String(error.to_string()));
    if let CheckError::UnsupportedRuleType { supported, .. } = error {
        meta.insert(
            "supported_types".into(),
            Value::Array(supported.iter().cloned().map(Value::String).collect()),
        );
    }

    let mut sample = Sample::default().message(error.to_string()).hint(rule.hint.as_deref());
    if let Some(column) = column {
        sample = sample.column(column);
    }

    RuleResult {
        rule: rule.id.clone(),
        level: Level::Fail,
        count: 1,
        samples: vec![sample],
        meta: Some(meta),
    }
}

pub fn to_result(rule: &Rule, evaluated: Result<Outcome, CheckError>) -> RuleResult {
    match evaluated {
        Ok(outcome) => from_outcome(rule, outcome),
        Err(error) => from_error(rule, &error),
    }
}

/// Sorts results into report order and derives the summary in the same pass.
pub fn aggregate(mut results: Vec<RuleResult>) -> (Vec<RuleResult>, Summary) {
    results.sort_by(RuleResult::sort_cmp);

    let mut summary = Summary::default();
    for result in &results {
        summary.by_level.record(result.level);
        summary
            .by_rule
            .entry(result.rule.clone())
            .and_modify(|level| *level = (*level).max(result.level))
            .or_insert(result.level);
    }
    (results, summary)
}
