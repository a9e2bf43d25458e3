// fairy/src/commands/rulepack.rs
//
// USE CASE: Inspect rulepacks and the rule types this build supports.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use fairy_core::CheckRegistry;
use fairy_core::infrastructure::load_rulepack;

pub fn check(path: &Path) -> anyhow::Result<ExitCode> {
    let rulepack = load_rulepack(path)
        .with_context(|| format!("Failed to load rulepack {}", path.display()))?;
    let registry = CheckRegistry::builtin();

    println!(
        "Rulepack: {}@{} ({} rules)",
        rulepack.id(),
        rulepack.version(),
        rulepack.rules().len()
    );
    if let Some(description) = rulepack.description() {
        println!("{}", description);
    }
    println!("sha256: {}", rulepack.identity().sha256);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Rule", "Type", "Severity", "Input", "Supported"]);

    let mut unsupported = 0usize;
    for rule in rulepack.rules() {
        let supported = registry.supports(&rule.rule_type);
        if !supported {
            unsupported += 1;
        }
        table.add_row(vec![
            rule.id.as_str(),
            rule.rule_type.as_str(),
            rule.severity.as_str(),
            rule.input().unwrap_or("-"),
            if supported { "yes" } else { "no" },
        ]);
    }
    println!("{table}");

    // Unknown types still load; they fail closed at evaluation time
    if unsupported > 0 {
        println!(
            "{} rule(s) use a type this build cannot evaluate and will be reported as fail.",
            unsupported
        );
    }
    Ok(ExitCode::SUCCESS)
}

pub fn types() -> anyhow::Result<ExitCode> {
    for rule_type in CheckRegistry::builtin().supported_types() {
        println!("{}", rule_type);
    }
    Ok(ExitCode::SUCCESS)
}
