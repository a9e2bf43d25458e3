// fairy/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fairy")]
#[command(about = "Deterministic rulepack preflight for tabular scientific metadata", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Log more to stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Runs a rulepack against the inputs and writes the preflight report
    Preflight(PreflightArgs),

    /// Rulepack utilities
    #[command(subcommand)]
    Rulepack(RulepackCommands),
}

#[derive(Args, Debug)]
pub struct PreflightArgs {
    /// Rulepack file (YAML or JSON)
    #[arg(long)]
    pub rulepack: PathBuf,

    /// Named input table, as NAME=PATH (repeatable)
    #[arg(long = "input", value_name = "NAME=PATH", value_parser = parse_input, required = true)]
    pub inputs: Vec<(String, PathBuf)>,

    /// Flat YAML mapping of params, hashed into the dataset id
    #[arg(long)]
    pub param_file: Option<PathBuf>,

    /// Output directory for report, Markdown, manifest and last-run cache
    #[arg(long, conflicts_with = "out", required_unless_present = "out")]
    pub out_dir: Option<PathBuf>,

    /// Report JSON path; siblings are written to its directory
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Version string recorded in the manifest and Markdown header
    #[arg(long)]
    pub fairy_version: Option<String>,

    /// Fixed generation timestamp (RFC 3339) for reproducible output
    #[arg(long, env = "FAIRY_FIXED_TIMESTAMP")]
    pub fixed_timestamp: Option<String>,

    /// Reject tables with ragged rows
    #[arg(long)]
    pub strict: bool,

    /// Omit the deprecated `_legacy` block from the JSON report
    #[arg(long)]
    pub no_legacy: bool,
}

#[derive(Subcommand)]
pub enum RulepackCommands {
    /// Loads and validates a rulepack, then lists its rules
    Check {
        /// Rulepack file (YAML or JSON)
        path: PathBuf,
    },

    /// Lists the rule types this build can evaluate
    Types,
}

fn parse_input(raw: &str) -> Result<(String, PathBuf), String> {
    let (name, path) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=PATH, got '{}'", raw))?;
    let name = name.trim();
    if name.is_empty() || path.trim().is_empty() {
        return Err(format!("expected NAME=PATH, got '{}'", raw));
    }
    Ok((name.to_string(), PathBuf::from(path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};
    use clap::Parser;

    #[test]
    fn test_cli_parse_preflight() -> Result<()> {
        let args = Cli::try_parse_from([
            "fairy",
            "preflight",
            "--rulepack",
            "rp.yaml",
            "--input",
            "samples=data/samples.tsv",
            "--input",
            "files=data/files.tsv",
            "--out-dir",
            "out",
        ])?;
        match args.command {
            Commands::Preflight(p) => {
                assert_eq!(p.inputs.len(), 2);
                assert_eq!(p.inputs[0].0, "samples");
                assert_eq!(p.inputs[1].1, PathBuf::from("data/files.tsv"));
                assert_eq!(p.out_dir, Some(PathBuf::from("out")));
                assert!(!p.no_legacy);
                Ok(())
            }
            _ => bail!("Expected Preflight command"),
        }
    }

    #[test]
    fn test_cli_requires_an_output() {
        let res = Cli::try_parse_from([
            "fairy",
            "preflight",
            "--rulepack",
            "rp.yaml",
            "--input",
            "samples=s.tsv",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn test_cli_out_and_out_dir_conflict() {
        let res = Cli::try_parse_from([
            "fairy", "preflight", "--rulepack", "rp.yaml", "--input", "s=s.tsv", "--out-dir",
            "a", "--out", "b/report.json",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn test_parse_input_rejects_bare_path() {
        assert!(parse_input("samples.tsv").is_err());
        assert!(parse_input("=samples.tsv").is_err());
        assert_eq!(
            parse_input("s=a=b.tsv").ok(),
            Some(("s".to_string(), PathBuf::from("a=b.tsv")))
        );
    }

    #[test]
    fn test_cli_parse_rulepack_check() -> Result<()> {
        let args = Cli::try_parse_from(["fairy", "rulepack", "check", "rp.yaml"])?;
        match args.command {
            Commands::Rulepack(RulepackCommands::Check { path }) => {
                assert_eq!(path, PathBuf::from("rp.yaml"));
                Ok(())
            }
            _ => bail!("Expected rulepack check"),
        }
    }
}
