// fairy-core/src/domain/report/legacy.rs
//
// Deprecated pre-v1 view (attestation + flat findings). Derived from a
// finished report at serialization time; the core never stores it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::level::Level;
use super::model::{ReportV1, Sample};

pub const LEGACY_DEPRECATION: &str = "The '_legacy' block is deprecated and will be removed in v1.2.0; \
     consumers should read metadata, summary and results instead.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyAttestation {
    pub rulepack_id: String,
    pub rulepack_version: String,
    pub rulepack_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rulepack_source_path: Option<String>,
    pub fairy_version: String,
    pub fairy_core_version: String,
    pub run_at_utc: String,
    pub submission_ready: bool,
    pub fail_count: usize,
    pub warn_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyFinding {
    pub code: String,
    pub severity: String,
    #[serde(rename = "where")]
    pub location: String,
    pub details: Value,
}

/// `fail_count`/`warn_count` count individual findings, while `findings`
/// lists only the samples each result retained (at most `MAX_SAMPLES` per rule).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyView {
    pub attestation: LegacyAttestation,
    pub findings: Vec<LegacyFinding>,
}

impl LegacyView {
    pub fn from_report(report: &ReportV1, fairy_version: &str) -> Self {
        let rulepack = &report.metadata().rulepack;
        let attestation = report.attestation();
        let findings_at = |level: Level| -> usize {
            report
                .results()
                .iter()
                .filter(|r| r.level == level)
                .map(|r| r.count)
                .sum()
        };
        let fail_count = findings_at(Level::Fail);

        let findings = report
            .results()
            .iter()
            .filter(|r| r.level != Level::Pass)
            .flat_map(|r| {
                r.samples.iter().map(move |s| LegacyFinding {
                    code: r.rule.clone(),
                    severity: r.level.legacy_label().to_string(),
                    location: location_of(s),
                    details: serde_json::json!({
                        "row": s.row,
                        "column": s.column,
                        "message": s.message,
                        "hint": s.hint,
                    }),
                })
            })
            .collect();

        Self {
            attestation: LegacyAttestation {
                rulepack_id: rulepack.id.clone(),
                rulepack_version: rulepack.version.clone(),
                rulepack_name: attestation.rulepack_name.clone(),
                rulepack_source_path: attestation.rulepack_source_path.clone(),
                fairy_version: fairy_version.to_string(),
                fairy_core_version: report.engine().fairy_core_version.clone(),
                run_at_utc: report.generated_at().to_string(),
                submission_ready: fail_count == 0,
                fail_count,
                warn_count: findings_at(Level::Warn),
            },
            findings,
        }
    }
}

fn location_of(sample: &Sample) -> String {
    let mut bits = Vec::new();
    if let Some(row) = sample.row {
        bits.push(format!("row {}", row));
    }
    if let Some(col) = &sample.column {
        bits.push(format!("column '{}'", col));
    }
    if bits.is_empty() {
        "table".to_string()
    } else {
        bits.join(", ")
    }
}

/// A report as written to disk: the v1 structure, optionally followed by the
/// deprecated `_legacy` block.
#[derive(Debug, Serialize)]
pub struct ReportEnvelope<'a> {
    #[serde(flatten)]
    pub report: &'a ReportV1,
    #[serde(rename = "_legacy", skip_serializing_if = "Option::is_none")]
    pub legacy: Option<LegacyView>,
}

impl<'a> ReportEnvelope<'a> {
    pub fn v1(report: &'a ReportV1) -> Self {
        Self {
            report,
            legacy: None,
        }
    }

    pub fn with_legacy(report: &'a ReportV1, fairy_version: &str) -> Self {
        Self {
            report,
            legacy: Some(LegacyView::from_report(report, fairy_version)),
        }
    }
}
