use std::sync::Arc;

use anyhow::Result;

use super::config::DbConfig;
use super::sqlite::factory::SqliteFactory;
use super::Database;

pub struct DbFactory;

impl DbFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn build_db(&self, cfg: &DbConfig) -> Result<Arc<Database>> {
        let sqlite = SqliteFactory::new().build_sqlite(&cfg.sqlite)?;
        Ok(Arc::new(Database::new(sqlite)))
    }
}
