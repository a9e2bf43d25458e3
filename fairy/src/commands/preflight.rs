// fairy/src/commands/preflight.rs
//
// USE CASE: Run a rulepack against named inputs and write the report bundle.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, bail};
use tracing::{info, warn};

use fairy_core::application::{RenderContext, ReportRenderer};
use fairy_core::domain::report::{LEGACY_DEPRECATION, ReportEnvelope};
use fairy_core::infrastructure::fs::{atomic_write, write_json_sorted};
use fairy_core::infrastructure::params::load_params;
use fairy_core::infrastructure::settings::load_settings;
use fairy_core::infrastructure::table_loader::resolve_input_path;
use fairy_core::infrastructure::{CsvTableLoader, MarkdownRenderer, load_rulepack};
use fairy_core::ports::{Clock, FixedClock, LoadOptions, SystemClock};
use fairy_core::{CheckRegistry, FAIRY_CORE_VERSION, Level, Report, ReportAssembler, RunRequest};

use crate::cache::{LastRunCache, resolved_since};
use crate::cli::PreflightArgs;
use crate::manifest::{self, MANIFEST_FILE};

pub const REPORT_FILE: &str = "preflight_report.json";
pub const MARKDOWN_FILE: &str = "preflight_report.md";

/// Exit code when the report holds fail-level results.
const EXIT_NOT_READY: u8 = 1;

struct OutputPaths {
    dir: PathBuf,
    report: PathBuf,
    markdown: PathBuf,
}

impl OutputPaths {
    fn from_args(args: &PreflightArgs) -> anyhow::Result<Self> {
        let (dir, report) = match (&args.out, &args.out_dir) {
            (Some(out), _) => {
                let dir = match out.parent() {
                    Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
                    _ => PathBuf::from("."),
                };
                (dir, out.clone())
            }
            (None, Some(dir)) => (dir.clone(), dir.join(REPORT_FILE)),
            (None, None) => bail!("one of --out or --out-dir is required"),
        };
        let markdown = dir.join(MARKDOWN_FILE);
        Ok(Self {
            dir,
            report,
            markdown,
        })
    }
}

pub fn execute(args: PreflightArgs) -> anyhow::Result<ExitCode> {
    // A. Layered config: fairy.yaml + ENV, then flags win
    let settings = load_settings(Path::new(".")).context("Failed to load engine settings")?;
    let strict = args.strict || settings.strict_tables;
    let legacy = !args.no_legacy && settings.legacy_block;
    let fairy_version = args
        .fairy_version
        .clone()
        .unwrap_or_else(|| FAIRY_CORE_VERSION.to_string());
    let paths = OutputPaths::from_args(&args)?;

    // B. Rulepack, params, inputs
    let rulepack = load_rulepack(&args.rulepack)
        .with_context(|| format!("Failed to load rulepack {}", args.rulepack.display()))?;
    let params = args
        .param_file
        .as_deref()
        .map(load_params)
        .transpose()
        .context("Failed to load params")?;

    let mut inputs = BTreeMap::new();
    for (name, raw) in &args.inputs {
        let path = resolve_input_path(raw)
            .with_context(|| format!("Input '{}' could not be resolved", name))?;
        if inputs.insert(name.clone(), path).is_some() {
            bail!("Input '{}' was given more than once", name);
        }
    }
    let input_paths: Vec<PathBuf> = inputs.values().cloned().collect();

    let clock: Box<dyn Clock> = match &args.fixed_timestamp {
        Some(ts) => Box::new(FixedClock::parse(ts).context("Invalid --fixed-timestamp")?),
        None => Box::new(SystemClock),
    };

    // C. Run (Application Layer)
    let mut request = RunRequest::new(rulepack).load_options(LoadOptions {
        delimiter: None,
        strict,
    });
    request.inputs = inputs;
    request.params = params;

    let registry = CheckRegistry::builtin();
    let loader = CsvTableLoader::new();
    let report = ReportAssembler::new(&registry, &loader, clock.as_ref()).run(request)?;

    // D. Write the bundle
    let envelope = if legacy {
        warn!("{}", LEGACY_DEPRECATION);
        ReportEnvelope::with_legacy(&report, &fairy_version)
    } else {
        ReportEnvelope::v1(&report)
    };
    write_json_sorted(&paths.report, &envelope)
        .with_context(|| format!("Failed to write {}", paths.report.display()))?;

    let cache = LastRunCache::in_dir(&paths.dir);
    let current: BTreeSet<String> = non_pass_codes(&report).map(str::to_string).collect();
    let resolved = cache.load().map(|prior| resolved_since(&prior, &current));

    let renderer = MarkdownRenderer::new()?;
    let markdown = renderer.render(
        &report,
        &RenderContext {
            fairy_version: fairy_version.clone(),
            resolved_since_last_run: resolved,
        },
    )?;
    atomic_write(&paths.markdown, markdown)
        .with_context(|| format!("Failed to write {}", paths.markdown.display()))?;

    let source_report = paths
        .report
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| REPORT_FILE.to_string());
    let manifest = manifest::build(
        &report,
        &fairy_version,
        &source_report,
        &input_paths,
        &[paths.report.clone(), paths.markdown.clone()],
    )?;
    let manifest_path = paths.dir.join(MANIFEST_FILE);
    write_json_sorted(&manifest_path, &manifest)
        .with_context(|| format!("Failed to write {}", manifest_path.display()))?;

    cache.store(current.iter().map(String::as_str))?;
    info!(dir = %paths.dir.display(), "Report bundle written");

    print!("{}", console_summary(&report, &fairy_version, &paths.report));

    if report.submission_ready() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_NOT_READY))
    }
}

fn non_pass_codes(report: &Report) -> impl Iterator<Item = &str> {
    report
        .summary()
        .by_rule
        .iter()
        .filter(|(_, level)| **level != Level::Pass)
        .map(|(id, _)| id.as_str())
}

fn console_summary(report: &Report, fairy_version: &str, report_path: &Path) -> String {
    let rulepack = &report.metadata().rulepack;
    let fail = report.rules_at(Level::Fail);
    let warn = report.rules_at(Level::Warn);

    let mut out = String::new();
    out.push_str("=== FAIRy Preflight ===\n");
    out.push_str(&format!("Rulepack: {}@{}\n", rulepack.id, rulepack.version));
    out.push_str(&format!("FAIRy version: {}\n", fairy_version));
    out.push_str(&format!("Generated at: {}\n", report.generated_at()));
    out.push_str(&format!("Dataset ID: {}\n", report.dataset_id()));
    out.push_str(&findings_line("FAIL", &fail));
    out.push_str(&findings_line("WARN", &warn));
    out.push_str(&format!("submission_ready: {}\n", report.submission_ready()));
    out.push_str(&format!("Report: {}\n", report_path.display()));
    out
}

fn findings_line(label: &str, codes: &[&str]) -> String {
    if codes.is_empty() {
        format!("{} findings: 0\n", label)
    } else {
        format!("{} findings: {} ({})\n", label, codes.len(), codes.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_findings_line() {
        assert_eq!(findings_line("FAIL", &[]), "FAIL findings: 0\n");
        assert_eq!(
            findings_line("WARN", &["a", "b"]),
            "WARN findings: 2 (a, b)\n"
        );
    }
}
