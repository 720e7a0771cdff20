mod sqlite;

#[cfg(test)]
mod tests;

pub mod config;
pub mod factory;

use std::sync::Mutex;

use anyhow::{bail, Result};
use sqlite::Sqlite;

use crate::types::announcement::Announcement;
use crate::types::budget::{BudgetSettings, ForumBudget};
use crate::types::event::Event;
use crate::types::file::FileInfo;
use crate::types::folder::Folder;
use crate::types::member::Member;
use crate::types::metrics::DashboardMetrics;
use crate::types::permission::PermissionRule;

/// Database transaction trait that defines all database operations.
///
/// Lookups by id return `None` for missing rows, deletes and updates report whether a
/// row was touched. Every other failure is an error and aborts the transaction.
pub trait Transaction {
    // User operations
    fn create_user(&self, user: &UserRecord) -> Result<()>;
    fn get_user(&self, email: &str) -> Result<Option<UserRecord>>;
    fn is_user_exists(&self, email: &str) -> Result<bool>;
    fn update_user_last_seen(&self, email: &str, time: u64) -> Result<()>;

    // Member operations
    fn create_member(&self, member: Member) -> Result<Member>;
    /// Lists members joined with their login's last heartbeat, ordered by name.
    fn list_members(&self) -> Result<Vec<MemberRecord>>;

    // Event operations
    fn create_event(&self, event: Event) -> Result<Event>;
    fn get_event(&self, id: u64) -> Result<Option<Event>>;
    fn list_events(&self) -> Result<Vec<Event>>;
    fn delete_event(&self, id: u64) -> Result<bool>;

    // Permission operations
    fn list_permissions(&self) -> Result<Vec<PermissionRule>>;
    fn get_permission(&self, action_key: &str) -> Result<Option<PermissionRule>>;
    /// Replaces the whole role set of a rule, creating it when absent.
    fn upsert_permission(&self, rule: PermissionRule) -> Result<PermissionRule>;

    // Dashboard metrics operations
    fn get_metrics(&self) -> Result<Option<DashboardMetrics>>;
    fn save_metrics(&self, metrics: DashboardMetrics) -> Result<DashboardMetrics>;

    // Budget operations
    fn get_budget_settings(&self) -> Result<Option<BudgetSettings>>;
    fn save_budget_settings(&self, total_amount: f64, updated_by: &str)
        -> Result<BudgetSettings>;
    fn list_forum_budgets(&self) -> Result<Vec<ForumBudget>>;
    fn get_forum_budget(&self, id: u64) -> Result<Option<ForumBudget>>;
    fn is_forum_name_exists(&self, name: &str) -> Result<bool>;
    fn create_forum_budget(&self, name: &str) -> Result<ForumBudget>;
    fn rename_forum_budget(&self, id: u64, name: &str) -> Result<bool>;
    fn update_forum_allocation(&self, id: u64, amount: f64) -> Result<bool>;

    // Folder operations
    fn create_folder(&self, folder: Folder) -> Result<Folder>;
    fn get_folder(&self, id: u64) -> Result<Option<Folder>>;
    fn list_folders(&self) -> Result<Vec<Folder>>;
    fn update_folder(&self, folder: &Folder) -> Result<()>;
    /// Deletes a folder. Its files and sub-folders move to the root.
    fn delete_folder(&self, id: u64) -> Result<bool>;

    // File operations
    fn create_file(&self, file: FileInfo) -> Result<FileInfo>;
    fn get_file(&self, id: u64) -> Result<Option<FileInfo>>;
    fn list_files(&self) -> Result<Vec<FileInfo>>;
    fn move_file(&self, id: u64, folder_id: Option<u64>) -> Result<bool>;
    fn delete_file(&self, id: u64) -> Result<bool>;

    // Announcement operations
    fn create_announcement(&self, announcement: Announcement) -> Result<Announcement>;
    /// Newest first.
    fn list_announcements(&self) -> Result<Vec<Announcement>>;
    fn delete_announcement(&self, id: u64) -> Result<bool>;

    fn commit(self) -> Result<()>
    where
        Self: Sized;
    fn rollback(self) -> Result<()>
    where
        Self: Sized;
}

/// Login account. `email` is the identity carried by session tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub email: String,
    pub name: String,
    pub role: String,
    pub hash: String,
    pub salt: String,
    pub last_seen: u64,
    pub create_time: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberRecord {
    pub member: Member,
    pub last_seen: u64,
}

pub struct Database {
    conn: Mutex<Sqlite>,
}

impl Database {
    pub fn new(conn: Sqlite) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Runs `f` inside one transaction: committed when `f` returns `Ok`, rolled
    /// back otherwise. Calls are serialized on the single connection.
    pub fn with_transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&dyn Transaction) -> Result<T>,
    {
        let mut conn = match self.conn.lock() {
            Ok(conn) => conn,
            Err(e) => bail!("failed to lock database: {e:#}"),
        };
        let tx = conn.transaction()?;

        let result = f(&tx);

        if result.is_ok() {
            tx.commit()
        } else {
            tx.rollback()
        }?;

        result
    }

    #[cfg(test)]
    pub fn new_test() -> Self {
        Self::new(Sqlite::memory().unwrap())
    }
}

#[cfg(test)]
mod db_tests {
    use super::*;

    #[test]
    fn test_sqlite() {
        let db = Database::new_test();
        tests::run_all_tests(&db);
    }

    #[test]
    fn test_rollback_on_error() {
        let db = Database::new_test();
        let result: Result<()> = db.with_transaction(|tx| {
            tx.create_event(Event {
                id: 0,
                title: String::from("Doomed"),
                date: String::from("2026-12-01"),
                kind: String::from("general"),
                description: String::new(),
                create_time: 0,
            })?;
            bail!("abort after insert");
        });
        assert!(result.is_err());

        let events = db.with_transaction(|tx| tx.list_events()).unwrap();
        assert!(events.is_empty());
    }
}
