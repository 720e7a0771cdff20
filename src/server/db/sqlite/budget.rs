use anyhow::Result;
use chrono::Local;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};

use crate::types::budget::{BudgetSettings, ForumBudget};

const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS budget_settings (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    total_amount REAL NOT NULL,
    updated_by TEXT NOT NULL,
    update_time INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS forum_budget (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    forum_name TEXT NOT NULL UNIQUE,
    allocated_amount REAL NOT NULL DEFAULT 0,
    update_time INTEGER NOT NULL
);
"#;

const SELECT_FORUM: &str = "SELECT id, forum_name, allocated_amount, update_time FROM forum_budget";

pub fn create_budget_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLES)?;
    Ok(())
}

fn forum_from_row(row: &Row) -> rusqlite::Result<ForumBudget> {
    Ok(ForumBudget {
        id: row.get(0)?,
        forum_name: row.get(1)?,
        allocated_amount: row.get(2)?,
        update_time: row.get(3)?,
    })
}

pub fn get_budget_settings(tx: &Transaction) -> Result<Option<BudgetSettings>> {
    let mut stmt = tx.prepare(
        "SELECT total_amount, updated_by, update_time FROM budget_settings WHERE id = 1",
    )?;
    let settings = stmt
        .query_row([], |row| {
            Ok(BudgetSettings {
                total_amount: row.get(0)?,
                updated_by: row.get(1)?,
                update_time: row.get(2)?,
            })
        })
        .optional()?;
    Ok(settings)
}

pub fn save_budget_settings(
    tx: &Transaction,
    total_amount: f64,
    updated_by: &str,
) -> Result<BudgetSettings> {
    let now = Local::now().timestamp() as u64;
    tx.execute(
        r#"
INSERT INTO budget_settings (id, total_amount, updated_by, update_time) VALUES (1, ?, ?, ?)
ON CONFLICT(id) DO UPDATE SET
    total_amount = excluded.total_amount,
    updated_by = excluded.updated_by,
    update_time = excluded.update_time
"#,
        params![total_amount, updated_by, now],
    )?;
    Ok(BudgetSettings {
        total_amount,
        updated_by: updated_by.to_string(),
        update_time: now,
    })
}

pub fn list_forum_budgets(tx: &Transaction) -> Result<Vec<ForumBudget>> {
    let sql = format!("{SELECT_FORUM} ORDER BY forum_name");
    let mut stmt = tx.prepare(&sql)?;
    let rows = stmt.query_map([], forum_from_row)?;

    let mut forums = Vec::new();
    for row in rows {
        forums.push(row?);
    }
    Ok(forums)
}

pub fn get_forum_budget(tx: &Transaction, id: u64) -> Result<Option<ForumBudget>> {
    let sql = format!("{SELECT_FORUM} WHERE id = ?");
    let mut stmt = tx.prepare(&sql)?;
    let forum = stmt.query_row(params![id], forum_from_row).optional()?;
    Ok(forum)
}

pub fn is_forum_name_exists(tx: &Transaction, name: &str) -> Result<bool> {
    let mut stmt = tx.prepare("SELECT COUNT(*) FROM forum_budget WHERE forum_name = ?")?;
    let count: i64 = stmt.query_row(params![name], |row| row.get(0))?;
    Ok(count > 0)
}

pub fn create_forum_budget(tx: &Transaction, name: &str) -> Result<ForumBudget> {
    let now = Local::now().timestamp() as u64;
    tx.execute(
        "INSERT INTO forum_budget (forum_name, allocated_amount, update_time) VALUES (?, 0, ?)",
        params![name, now],
    )?;
    Ok(ForumBudget {
        id: tx.last_insert_rowid() as u64,
        forum_name: name.to_string(),
        allocated_amount: 0.0,
        update_time: now,
    })
}

pub fn rename_forum_budget(tx: &Transaction, id: u64, name: &str) -> Result<bool> {
    let now = Local::now().timestamp() as u64;
    let count = tx.execute(
        "UPDATE forum_budget SET forum_name = ?, update_time = ? WHERE id = ?",
        params![name, now, id],
    )?;
    Ok(count > 0)
}

pub fn update_forum_allocation(tx: &Transaction, id: u64, amount: f64) -> Result<bool> {
    let now = Local::now().timestamp() as u64;
    let count = tx.execute(
        "UPDATE forum_budget SET allocated_amount = ?, update_time = ? WHERE id = ?",
        params![amount, now, id],
    )?;
    Ok(count > 0)
}
