use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::config::{expandenv, CommonConfig, PathSet};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SqliteConfig {
    /// Keep everything in memory. Records are gone after a restart.
    #[serde(default = "SqliteConfig::default_memory")]
    pub memory: bool,

    /// Database file. Default: {data_path}/orgdash.db
    #[serde(default = "SqliteConfig::default_path")]
    pub path: String,

    /// How long a statement waits on a locked database file before failing,
    /// e.g. while an operator runs a backup. Range: 1-60.
    #[serde(default = "SqliteConfig::default_busy_timeout_secs")]
    pub busy_timeout_secs: u64,
}

impl CommonConfig for SqliteConfig {
    fn default() -> Self {
        Self {
            memory: Self::default_memory(),
            path: Self::default_path(),
            busy_timeout_secs: Self::default_busy_timeout_secs(),
        }
    }

    fn complete(&mut self, ps: &PathSet) -> Result<()> {
        if !(1..=60).contains(&self.busy_timeout_secs) {
            bail!("busy_timeout_secs should be in range [1, 60]");
        }
        if self.memory {
            return Ok(());
        }

        self.path = expandenv("path", &self.path)?;
        if self.path.is_empty() {
            let path = ps.data_path.join("orgdash.db");
            self.path = format!("{}", path.display());
        }

        Ok(())
    }
}

impl SqliteConfig {
    fn default_memory() -> bool {
        false
    }

    fn default_path() -> String {
        String::new()
    }

    fn default_busy_timeout_secs() -> u64 {
        5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_config() {
        let ps = PathSet::new_test();

        let mut cfg = SqliteConfig::default();
        cfg.complete(&ps).unwrap();
        assert!(cfg.path.ends_with("orgdash.db"));

        let mut cfg = SqliteConfig::default();
        cfg.memory = true;
        cfg.complete(&ps).unwrap();
        assert!(cfg.path.is_empty());

        let mut cfg = SqliteConfig::default();
        cfg.busy_timeout_secs = 0;
        assert!(cfg.complete(&ps).is_err());
    }
}
