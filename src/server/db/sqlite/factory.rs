use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};

use super::config::SqliteConfig;
use super::Sqlite;

pub struct SqliteFactory;

impl SqliteFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn build_sqlite(&self, cfg: &SqliteConfig) -> Result<Sqlite> {
        if cfg.memory {
            warn!("Using in-memory sqlite database, all records are lost when the server stops");
            return Sqlite::memory();
        }

        info!(
            "Opening sqlite database '{}', busy timeout {}s",
            cfg.path, cfg.busy_timeout_secs
        );
        let busy_timeout = Duration::from_secs(cfg.busy_timeout_secs);
        Sqlite::open(Path::new(&cfg.path), busy_timeout)
            .with_context(|| format!("open sqlite '{}'", cfg.path))
    }
}
