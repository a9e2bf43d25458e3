// fairy-core/src/application/assembler.rs
//
// Orchestrates one preflight run:
// Loading -> Evaluating -> Aggregating -> Finalized.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use tracing::{debug, info, instrument, warn};

use crate::FAIRY_CORE_VERSION;
use crate::domain::aggregate;
use crate::domain::checks::{CheckRegistry, Tables};
use crate::domain::error::DomainError;
use crate::domain::provenance::{CANON_VERSION_V1, compute_dataset_id, compute_params_sha256};
use crate::domain::report::{
    Attestation, EngineInfo, InputMetadata, Level, Metadata, Report, RuleResult, RulepackMetadata,
};
use crate::domain::rulepack::{Params, Rulepack, validate_params};
use crate::error::FairyError;
use crate::infrastructure::hashing::hash_file;
use crate::ports::clock::Clock;
use crate::ports::table_source::{LoadOptions, TableSource};

/// Everything one run needs besides its collaborators.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub rulepack: Rulepack,
    /// Input name -> file path.
    pub inputs: BTreeMap<String, PathBuf>,
    /// Caller-supplied params, hashed exactly as given.
    pub params: Option<Params>,
    pub load_options: LoadOptions,
}

impl RunRequest {
    pub fn new(rulepack: Rulepack) -> Self {
        Self {
            rulepack,
            inputs: BTreeMap::new(),
            params: None,
            load_options: LoadOptions::default(),
        }
    }

    pub fn input(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.inputs.insert(name.into(), path.into());
        self
    }

    pub fn params(mut self, params: Params) -> Self {
        self.params = Some(params);
        self
    }

    pub fn load_options(mut self, options: LoadOptions) -> Self {
        self.load_options = options;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Stage {
    Loading,
    Evaluating,
    Aggregating,
    Finalized,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Loading => "loading",
            Stage::Evaluating => "evaluating",
            Stage::Aggregating => "aggregating",
            Stage::Finalized => "finalized",
        };
        f.write_str(s)
    }
}

/// Runs a rulepack against a set of inputs and builds the report. Consumed
/// by `run`, so an assembler serves exactly one run.
pub struct ReportAssembler<'a> {
    registry: &'a CheckRegistry,
    source: &'a dyn TableSource,
    clock: &'a dyn Clock,
    stage: Stage,
}

struct Loaded {
    tables: Tables,
    inputs: BTreeMap<String, InputMetadata>,
}

impl<'a> ReportAssembler<'a> {
    pub fn new(
        registry: &'a CheckRegistry,
        source: &'a dyn TableSource,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            registry,
            source,
            clock,
            stage: Stage::Loading,
        }
    }

    fn advance(&mut self, next: Stage) -> Result<(), DomainError> {
        if next <= self.stage {
            return Err(DomainError::Lifecycle {
                from: self.stage.to_string(),
                to: next.to_string(),
            });
        }
        debug!(from = %self.stage, to = %next, "stage transition");
        self.stage = next;
        Ok(())
    }

    #[instrument(skip_all, fields(rulepack = %request.rulepack.id(), inputs = request.inputs.len()))]
    pub fn run(mut self, request: RunRequest) -> Result<Report, FairyError> {
        let RunRequest {
            rulepack,
            inputs,
            params,
            load_options,
        } = request;

        if inputs.is_empty() {
            return Err(DomainError::NoInputs.into());
        }
        if let Some(p) = &params {
            validate_params(p)?;
        }

        // Loading: fatal on any error, before a single rule runs
        let loaded = self.load_inputs(&inputs, &load_options)?;

        self.advance(Stage::Evaluating)?;
        let results = self.evaluate(&rulepack, &loaded.tables);

        self.advance(Stage::Aggregating)?;
        let (results, summary) = aggregate::aggregate(results);

        let params_sha256 = compute_params_sha256(params.as_ref())?;
        let inputs_sha256: BTreeMap<String, String> = loaded
            .inputs
            .iter()
            .map(|(name, meta)| (name.clone(), meta.sha256.clone()))
            .collect();
        let identity = rulepack.identity();
        let dataset_id =
            compute_dataset_id(&inputs_sha256, identity, &params_sha256, CANON_VERSION_V1)?;

        self.advance(Stage::Finalized)?;
        let metadata = Metadata {
            inputs: loaded.inputs,
            rulepack: RulepackMetadata {
                path: rulepack.source_path().map(str::to_string),
                sha256: identity.sha256.clone(),
                id: identity.id.clone(),
                version: identity.version.clone(),
                params_sha256,
            },
        };
        let report = Report::new(
            self.clock.timestamp(),
            dataset_id,
            metadata,
            summary,
            results,
            EngineInfo {
                fairy_core_version: FAIRY_CORE_VERSION.to_string(),
            },
            Attestation {
                rulepack_name: rulepack.name().to_string(),
                rulepack_version: identity.version.clone(),
                rulepack_source_path: rulepack.source_path().map(str::to_string),
            },
        );

        info!(
            dataset_id = report.dataset_id(),
            fail = report.summary().by_level.fail,
            warn = report.summary().by_level.warn,
            pass = report.summary().by_level.pass,
            "Report finalized"
        );
        Ok(report)
    }

    fn load_inputs(
        &self,
        inputs: &BTreeMap<String, PathBuf>,
        options: &LoadOptions,
    ) -> Result<Loaded, FairyError> {
        let mut tables = Tables::new();
        let mut metadata = BTreeMap::new();

        for (name, path) in inputs {
            let table = self.source.load(path, options)?;
            let sha256 = hash_file(path)?;
            info!(input = %name, rows = table.n_rows(), cols = table.n_cols(), "Input loaded");

            metadata.insert(
                name.clone(),
                InputMetadata {
                    path: path.display().to_string(),
                    sha256,
                    n_rows: table.n_rows(),
                    n_cols: table.n_cols(),
                    header: table.columns().to_vec(),
                },
            );
            tables.insert(name.clone(), table);
        }
        Ok(Loaded {
            tables,
            inputs: metadata,
        })
    }

    fn evaluate(&self, rulepack: &Rulepack, tables: &Tables) -> Vec<RuleResult> {
        rulepack
            .rules()
            .iter()
            .map(|rule| {
                let evaluated = self.registry.evaluate(rule, tables);
                if let Err(e) = &evaluated {
                    warn!(rule = %rule.id, error = e.code(), "rule could not be evaluated: {}", e);
                }
                let result = aggregate::to_result(rule, evaluated);
                if result.level != Level::Pass {
                    debug!(rule = %result.rule, level = %result.level, count = result.count, "rule violated");
                }
                result
            })
            .collect()
    }
}
