// fairy-core/src/infrastructure/render.rs
//
// Curator-facing Markdown one-pager, rendered with minijinja.

use minijinja::Environment;
use serde::Serialize;

use crate::application::ports::{RenderContext, ReportRenderer};
use crate::domain::report::{Level, Report, RuleResult};
use crate::error::FairyError;
use crate::infrastructure::error::InfrastructureError;

const TEMPLATE_NAME: &str = "preflight_report.md";

const TEMPLATE: &str = r#"# FAIRy Preflight Report

- **Rulepack:** {{ rulepack_id }}@{{ rulepack_version }}
- **FAIRy version:** {{ fairy_version }}
- **Generated at (UTC):** {{ generated_at }}
- **Dataset ID:** `{{ dataset_id }}`
- **submission_ready:** `{{ submission_ready }}`

## Summary

| Level | Rules |
|-------|-------|
| fail | {{ fail_count }} |
| warn | {{ warn_count }} |
| pass | {{ pass_count }} |

{% if fail_codes %}- FAIL: {{ fail_codes | join(", ") }}
{% endif %}{% if warn_codes %}- WARN: {{ warn_codes | join(", ") }}
{% endif %}
If `submission_ready` is `true`, no rule failed and the dataset is ready to submit.

---

## Input provenance

These hashes and dimensions identify the exact files that were checked.

{% for input in inputs %}
### {{ input.name }}

- path: `{{ input.path }}`
- sha256: `{{ input.sha256 }}`
- rows: {{ input.n_rows }}
- cols: {{ input.n_cols }}

{% endfor %}
---

## Findings

Level `fail` means "must fix before submission"; `warn` means "likely curator feedback".

{% if findings %}
| Level | Rule | Count | Location | Example | Hint |
|-------|------|-------|----------|---------|------|
{% for f in findings %}
| {{ f.level }} | {{ f.rule | cell }} | {{ f.count }} | {{ f.location | cell }} | {{ f.example | cell }} | {{ f.hint | cell }} |
{% endfor %}
{% else %}
_No findings._
{% endif %}

---

## Resolved since last run

{% if resolved is none %}
_No baseline from a prior run._
{% elif resolved %}
{% for code in resolved %}
- {{ code }}
{% endfor %}
{% else %}
_No previously-reported issues resolved._
{% endif %}
"#;

#[derive(Serialize)]
struct InputRow<'a> {
    name: &'a str,
    path: &'a str,
    sha256: &'a str,
    n_rows: usize,
    n_cols: usize,
}

#[derive(Serialize)]
struct FindingRow<'a> {
    level: &'static str,
    rule: &'a str,
    count: usize,
    location: String,
    example: String,
    hint: String,
}

impl<'a> FindingRow<'a> {
    fn from_result(r: &'a RuleResult) -> Self {
        let location = match (r.input(), r.column()) {
            ("", "") => String::new(),
            (input, "") => input.to_string(),
            ("", column) => column.to_string(),
            (input, column) => format!("{}.{}", input, column),
        };
        let first = r.samples.first();
        let example = first
            .map(|s| match (s.row, s.message.as_deref()) {
                (Some(row), Some(msg)) => format!("row {}: {}", row, msg),
                (Some(row), None) => format!("row {}", row),
                (None, Some(msg)) => msg.to_string(),
                (None, None) => String::new(),
            })
            .unwrap_or_default();
        let hint = first.and_then(|s| s.hint.clone()).unwrap_or_default();

        Self {
            level: r.level.as_str(),
            rule: &r.rule,
            count: r.count,
            location,
            example,
            hint,
        }
    }
}

#[derive(Serialize)]
struct MarkdownContext<'a> {
    rulepack_id: &'a str,
    rulepack_version: &'a str,
    fairy_version: &'a str,
    generated_at: &'a str,
    dataset_id: &'a str,
    submission_ready: bool,
    fail_count: usize,
    warn_count: usize,
    pass_count: usize,
    fail_codes: Vec<&'a str>,
    warn_codes: Vec<&'a str>,
    inputs: Vec<InputRow<'a>>,
    findings: Vec<FindingRow<'a>>,
    resolved: Option<&'a [String]>,
}

/// Escapes a value for use inside a Markdown table cell.
fn table_cell(value: &str) -> String {
    value
        .replace('|', r"\|")
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
}

pub struct MarkdownRenderer {
    env: Environment<'static>,
}

impl MarkdownRenderer {
    pub fn new() -> Result<Self, InfrastructureError> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.add_filter("cell", |value: &str| table_cell(value));
        env.add_template(TEMPLATE_NAME, TEMPLATE)?;
        Ok(Self { env })
    }

    fn context<'a>(report: &'a Report, ctx: &'a RenderContext) -> MarkdownContext<'a> {
        let summary = report.summary();
        let rulepack = &report.metadata().rulepack;
        MarkdownContext {
            rulepack_id: &rulepack.id,
            rulepack_version: &rulepack.version,
            fairy_version: &ctx.fairy_version,
            generated_at: report.generated_at(),
            dataset_id: report.dataset_id(),
            submission_ready: report.submission_ready(),
            fail_count: summary.by_level.fail,
            warn_count: summary.by_level.warn,
            pass_count: summary.by_level.pass,
            fail_codes: report.rules_at(Level::Fail),
            warn_codes: report.rules_at(Level::Warn),
            inputs: report
                .metadata()
                .inputs
                .iter()
                .map(|(name, m)| InputRow {
                    name,
                    path: &m.path,
                    sha256: &m.sha256,
                    n_rows: m.n_rows,
                    n_cols: m.n_cols,
                })
                .collect(),
            findings: report
                .results()
                .iter()
                .filter(|r| r.level != Level::Pass)
                .map(FindingRow::from_result)
                .collect(),
            resolved: ctx.resolved_since_last_run.as_deref(),
        }
    }
}

impl ReportRenderer for MarkdownRenderer {
    fn render(&self, report: &Report, context: &RenderContext) -> Result<String, FairyError> {
        let template = self
            .env
            .get_template(TEMPLATE_NAME)
            .map_err(InfrastructureError::TemplateError)?;
        let text = template
            .render(Self::context(report, context))
            .map_err(InfrastructureError::TemplateError)?;
        Ok(text)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_table_cell_escaping() {
        assert_eq!(table_cell("a|b\nc"), r"a\|b c");
    }

    #[test]
    fn test_template_compiles() {
        assert!(MarkdownRenderer::new().is_ok());
    }
}
