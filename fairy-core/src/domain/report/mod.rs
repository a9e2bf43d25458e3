// fairy-core/src/domain/report/mod.rs

pub mod legacy;
pub mod level;
pub mod model;

pub use legacy::{LEGACY_DEPRECATION, LegacyView, ReportEnvelope};
pub use level::Level;
pub use model::{
    Attestation, EngineInfo, InputMetadata, LevelCounts, MAX_SAMPLES, Metadata, ReportV1, ResultMeta,
    RuleResult, RulepackMetadata, SCHEMA_VERSION, Sample, Summary,
};

/// The current report version.
pub type Report = ReportV1;
