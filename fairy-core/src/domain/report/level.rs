// fairy-core/src/domain/report/level.rs

use serde::{Deserialize, Serialize};
use std::fmt;

// Declaration order gives Pass < Warn < Fail, so "highest severity wins" is `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    #[default]
    Pass,
    Warn,
    Fail,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Warn => "warn",
            Self::Fail => "fail",
        }
    }

    /// Upper-case label used by the legacy attestation block.
    pub fn legacy_label(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Warn => "WARN",
            Self::Fail => "FAIL",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pass" => Ok(Self::Pass),
            "warn" => Ok(Self::Warn),
            "fail" => Ok(Self::Fail),
            _ => Err(format!("Unknown level: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Pass < Level::Warn);
        assert!(Level::Warn < Level::Fail);
        assert_eq!(Level::Warn.max(Level::Fail), Level::Fail);
    }

    #[test]
    fn test_display_and_parsing_consistency() -> anyhow::Result<()> {
        use std::str::FromStr;
        assert_eq!(Level::Fail.to_string(), "fail");
        assert_eq!(
            Level::from_str("WARN").map_err(|e| anyhow::anyhow!(e))?,
            Level::Warn
        );
        assert!(Level::from_str("error").is_err());
        Ok(())
    }
}
