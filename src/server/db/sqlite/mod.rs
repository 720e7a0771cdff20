mod announcement;
mod budget;
mod event;
mod file;
mod folder;
mod member;
mod metrics;
mod permission;
mod user;

pub mod config;
pub mod factory;

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use rusqlite::Connection as RawConnection;
use rusqlite::Transaction as RawTransaction;

use crate::types::announcement::Announcement;
use crate::types::budget::{BudgetSettings, ForumBudget};
use crate::types::event::Event;
use crate::types::file::FileInfo;
use crate::types::folder::Folder;
use crate::types::member::Member;
use crate::types::metrics::DashboardMetrics;
use crate::types::permission::PermissionRule;

use super::{MemberRecord, Transaction, UserRecord};

/// SQLite-based database implementation, file-based or in-memory.
pub struct Sqlite {
    conn: RawConnection,
}

pub struct SqliteTransaction<'a> {
    tx: RawTransaction<'a>,
}

impl Sqlite {
    /// Opens a SQLite database file, creating it and all tables when missing.
    pub fn open(path: &Path, busy_timeout: Duration) -> Result<Self> {
        let conn = RawConnection::open(path)?;
        conn.busy_timeout(busy_timeout)?;
        Self::init_tables(&conn)?;
        Ok(Self { conn })
    }

    /// Data is lost when the program exits. Recommended for testing only.
    pub fn memory() -> Result<Self> {
        let conn = RawConnection::open_in_memory()?;
        Self::init_tables(&conn)?;
        Ok(Self { conn })
    }

    pub fn transaction(&mut self) -> Result<SqliteTransaction<'_>> {
        let tx = self.conn.transaction()?;
        Ok(SqliteTransaction { tx })
    }

    fn init_tables(db: &RawConnection) -> Result<()> {
        user::create_user_tables(db)?;
        member::create_member_tables(db)?;
        event::create_event_tables(db)?;
        permission::create_permission_tables(db)?;
        metrics::create_metrics_tables(db)?;
        budget::create_budget_tables(db)?;
        folder::create_folder_tables(db)?;
        file::create_file_tables(db)?;
        announcement::create_announcement_tables(db)?;
        Ok(())
    }
}

impl Transaction for SqliteTransaction<'_> {
    fn create_user(&self, user: &UserRecord) -> Result<()> {
        user::create_user(&self.tx, user)
    }

    fn get_user(&self, email: &str) -> Result<Option<UserRecord>> {
        user::get_user(&self.tx, email)
    }

    fn is_user_exists(&self, email: &str) -> Result<bool> {
        user::is_user_exists(&self.tx, email)
    }

    fn update_user_last_seen(&self, email: &str, time: u64) -> Result<()> {
        user::update_user_last_seen(&self.tx, email, time)
    }

    fn create_member(&self, member: Member) -> Result<Member> {
        member::create_member(&self.tx, member)
    }

    fn list_members(&self) -> Result<Vec<MemberRecord>> {
        member::list_members(&self.tx)
    }

    fn create_event(&self, event: Event) -> Result<Event> {
        event::create_event(&self.tx, event)
    }

    fn get_event(&self, id: u64) -> Result<Option<Event>> {
        event::get_event(&self.tx, id)
    }

    fn list_events(&self) -> Result<Vec<Event>> {
        event::list_events(&self.tx)
    }

    fn delete_event(&self, id: u64) -> Result<bool> {
        event::delete_event(&self.tx, id)
    }

    fn list_permissions(&self) -> Result<Vec<PermissionRule>> {
        permission::list_permissions(&self.tx)
    }

    fn get_permission(&self, action_key: &str) -> Result<Option<PermissionRule>> {
        permission::get_permission(&self.tx, action_key)
    }

    fn upsert_permission(&self, rule: PermissionRule) -> Result<PermissionRule> {
        permission::upsert_permission(&self.tx, rule)
    }

    fn get_metrics(&self) -> Result<Option<DashboardMetrics>> {
        metrics::get_metrics(&self.tx)
    }

    fn save_metrics(&self, metrics: DashboardMetrics) -> Result<DashboardMetrics> {
        metrics::save_metrics(&self.tx, metrics)
    }

    fn get_budget_settings(&self) -> Result<Option<BudgetSettings>> {
        budget::get_budget_settings(&self.tx)
    }

    fn save_budget_settings(&self, total_amount: f64, updated_by: &str) -> Result<BudgetSettings> {
        budget::save_budget_settings(&self.tx, total_amount, updated_by)
    }

    fn list_forum_budgets(&self) -> Result<Vec<ForumBudget>> {
        budget::list_forum_budgets(&self.tx)
    }

    fn get_forum_budget(&self, id: u64) -> Result<Option<ForumBudget>> {
        budget::get_forum_budget(&self.tx, id)
    }

    fn is_forum_name_exists(&self, name: &str) -> Result<bool> {
        budget::is_forum_name_exists(&self.tx, name)
    }

    fn create_forum_budget(&self, name: &str) -> Result<ForumBudget> {
        budget::create_forum_budget(&self.tx, name)
    }

    fn rename_forum_budget(&self, id: u64, name: &str) -> Result<bool> {
        budget::rename_forum_budget(&self.tx, id, name)
    }

    fn update_forum_allocation(&self, id: u64, amount: f64) -> Result<bool> {
        budget::update_forum_allocation(&self.tx, id, amount)
    }

    fn create_folder(&self, folder: Folder) -> Result<Folder> {
        folder::create_folder(&self.tx, folder)
    }

    fn get_folder(&self, id: u64) -> Result<Option<Folder>> {
        folder::get_folder(&self.tx, id)
    }

    fn list_folders(&self) -> Result<Vec<Folder>> {
        folder::list_folders(&self.tx)
    }

    fn update_folder(&self, folder: &Folder) -> Result<()> {
        folder::update_folder(&self.tx, folder)
    }

    fn delete_folder(&self, id: u64) -> Result<bool> {
        folder::delete_folder(&self.tx, id)
    }

    fn create_file(&self, file: FileInfo) -> Result<FileInfo> {
        file::create_file(&self.tx, file)
    }

    fn get_file(&self, id: u64) -> Result<Option<FileInfo>> {
        file::get_file(&self.tx, id)
    }

    fn list_files(&self) -> Result<Vec<FileInfo>> {
        file::list_files(&self.tx)
    }

    fn move_file(&self, id: u64, folder_id: Option<u64>) -> Result<bool> {
        file::move_file(&self.tx, id, folder_id)
    }

    fn delete_file(&self, id: u64) -> Result<bool> {
        file::delete_file(&self.tx, id)
    }

    fn create_announcement(&self, announcement: Announcement) -> Result<Announcement> {
        announcement::create_announcement(&self.tx, announcement)
    }

    fn list_announcements(&self) -> Result<Vec<Announcement>> {
        announcement::list_announcements(&self.tx)
    }

    fn delete_announcement(&self, id: u64) -> Result<bool> {
        announcement::delete_announcement(&self.tx, id)
    }

    fn commit(self) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }

    fn rollback(self) -> Result<()> {
        self.tx.rollback()?;
        Ok(())
    }
}
