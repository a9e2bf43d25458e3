// fairy/src/commands/mod.rs

pub mod preflight;
pub mod rulepack;
