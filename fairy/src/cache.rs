// fairy/src/cache.rs
//
// Last-run cache: the non-pass rule codes of the previous run in an output
// directory, used to report what was resolved since.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use fairy_core::infrastructure::fs::write_json_sorted;

pub const LAST_RUN_FILE: &str = ".fairy_last_run.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct LastRun {
    codes: BTreeSet<String>,
}

pub struct LastRunCache {
    path: PathBuf,
}

impl LastRunCache {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(LAST_RUN_FILE),
        }
    }

    /// Codes from the previous run, or `None` when there is no usable baseline.
    pub fn load(&self) -> Option<BTreeSet<String>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => {
                debug!(path = %self.path.display(), "No last-run cache");
                return None;
            }
        };
        match serde_json::from_str::<LastRun>(&raw) {
            Ok(last) => Some(last.codes),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring unreadable last-run cache");
                None
            }
        }
    }

    pub fn store<'a, I>(&self, codes: I) -> anyhow::Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let last = LastRun {
            codes: codes.into_iter().map(str::to_string).collect(),
        };
        write_json_sorted(&self.path, &last)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

/// Codes present last time and absent now, sorted.
pub fn resolved_since(prior: &BTreeSet<String>, current: &BTreeSet<String>) -> Vec<String> {
    prior.difference(current).cloned().collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_roundtrip_and_resolution() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let cache = LastRunCache::in_dir(dir.path());
        assert!(cache.load().is_none());

        cache.store(["files.fk", "samples.required"])?;
        let prior = cache.load().unwrap();

        let current: BTreeSet<String> = ["samples.required".to_string()].into();
        assert_eq!(resolved_since(&prior, &current), vec!["files.fk"]);
        Ok(())
    }

    #[test]
    fn test_corrupt_cache_is_no_baseline() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join(LAST_RUN_FILE), "{not json")?;
        assert!(LastRunCache::in_dir(dir.path()).load().is_none());
        Ok(())
    }
}
