use anyhow::Result;
use chrono::Local;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};

use crate::types::folder::Folder;

const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS folder (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    color TEXT NOT NULL,
    parent_id INTEGER,
    created_by TEXT NOT NULL,
    create_time INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_folder_parent ON folder(parent_id);
"#;

const SELECT_FOLDER: &str =
    "SELECT id, name, color, parent_id, created_by, create_time FROM folder";

pub fn create_folder_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLES)?;
    Ok(())
}

fn folder_from_row(row: &Row) -> rusqlite::Result<Folder> {
    Ok(Folder {
        id: row.get(0)?,
        name: row.get(1)?,
        color: row.get(2)?,
        parent_id: row.get(3)?,
        created_by: row.get(4)?,
        create_time: row.get(5)?,
    })
}

pub fn create_folder(tx: &Transaction, mut folder: Folder) -> Result<Folder> {
    let now = Local::now().timestamp() as u64;
    tx.execute(
        "INSERT INTO folder (name, color, parent_id, created_by, create_time) VALUES (?, ?, ?, ?, ?)",
        params![
            folder.name,
            folder.color,
            folder.parent_id,
            folder.created_by,
            now
        ],
    )?;
    folder.id = tx.last_insert_rowid() as u64;
    folder.create_time = now;
    Ok(folder)
}

pub fn get_folder(tx: &Transaction, id: u64) -> Result<Option<Folder>> {
    let sql = format!("{SELECT_FOLDER} WHERE id = ?");
    let mut stmt = tx.prepare(&sql)?;
    let folder = stmt.query_row(params![id], folder_from_row).optional()?;
    Ok(folder)
}

pub fn list_folders(tx: &Transaction) -> Result<Vec<Folder>> {
    let sql = format!("{SELECT_FOLDER} ORDER BY name, id");
    let mut stmt = tx.prepare(&sql)?;
    let rows = stmt.query_map([], folder_from_row)?;

    let mut folders = Vec::new();
    for row in rows {
        folders.push(row?);
    }
    Ok(folders)
}

pub fn update_folder(tx: &Transaction, folder: &Folder) -> Result<()> {
    tx.execute(
        "UPDATE folder SET name = ?, color = ? WHERE id = ?",
        params![folder.name, folder.color, folder.id],
    )?;
    Ok(())
}

pub fn delete_folder(tx: &Transaction, id: u64) -> Result<bool> {
    let count = tx.execute("DELETE FROM folder WHERE id = ?", params![id])?;
    if count == 0 {
        return Ok(false);
    }

    let files = tx.execute(
        "UPDATE file SET folder_id = NULL WHERE folder_id = ?",
        params![id],
    )?;
    let children = tx.execute(
        "UPDATE folder SET parent_id = NULL WHERE parent_id = ?",
        params![id],
    )?;
    debug!("Folder {id} deleted, moved {files} files and {children} folders to root");
    Ok(true)
}
