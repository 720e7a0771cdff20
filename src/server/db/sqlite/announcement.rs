use anyhow::Result;
use chrono::Local;
use rusqlite::{params, Connection, Transaction};

use crate::types::announcement::Announcement;

const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS announcement (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    author TEXT NOT NULL,
    priority TEXT NOT NULL DEFAULT 'normal',
    create_time INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_announcement_create_time ON announcement(create_time);
"#;

pub fn create_announcement_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLES)?;
    Ok(())
}

pub fn create_announcement(tx: &Transaction, mut item: Announcement) -> Result<Announcement> {
    let now = Local::now().timestamp() as u64;
    tx.execute(
        "INSERT INTO announcement (title, content, author, priority, create_time) VALUES (?, ?, ?, ?, ?)",
        params![item.title, item.content, item.author, item.priority, now],
    )?;
    item.id = tx.last_insert_rowid() as u64;
    item.create_time = now;
    Ok(item)
}

pub fn list_announcements(tx: &Transaction) -> Result<Vec<Announcement>> {
    let mut stmt = tx.prepare(
        "SELECT id, title, content, author, priority, create_time FROM announcement ORDER BY create_time DESC, id DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(Announcement {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            author: row.get(3)?,
            priority: row.get(4)?,
            create_time: row.get(5)?,
        })
    })?;

    let mut items = Vec::new();
    for row in rows {
        items.push(row?);
    }
    Ok(items)
}

pub fn delete_announcement(tx: &Transaction, id: u64) -> Result<bool> {
    let count = tx.execute("DELETE FROM announcement WHERE id = ?", params![id])?;
    Ok(count > 0)
}
