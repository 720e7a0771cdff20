use anyhow::Result;
use chrono::Local;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};

use crate::types::file::FileInfo;

const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS file (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    filename TEXT NOT NULL,
    original_name TEXT NOT NULL,
    file_size INTEGER NOT NULL,
    mime_type TEXT NOT NULL,
    uploaded_by TEXT NOT NULL,
    file_path TEXT NOT NULL,
    folder_id INTEGER,
    upload_time INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_file_folder ON file(folder_id);
"#;

const SELECT_FILE: &str = "SELECT id, filename, original_name, file_size, mime_type, uploaded_by, file_path, folder_id, upload_time FROM file";

pub fn create_file_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLES)?;
    Ok(())
}

fn file_from_row(row: &Row) -> rusqlite::Result<FileInfo> {
    Ok(FileInfo {
        id: row.get(0)?,
        filename: row.get(1)?,
        original_name: row.get(2)?,
        file_size: row.get(3)?,
        mime_type: row.get(4)?,
        uploaded_by: row.get(5)?,
        file_path: row.get(6)?,
        folder_id: row.get(7)?,
        upload_time: row.get(8)?,
    })
}

pub fn create_file(tx: &Transaction, mut file: FileInfo) -> Result<FileInfo> {
    let now = Local::now().timestamp() as u64;
    tx.execute(
        "INSERT INTO file (filename, original_name, file_size, mime_type, uploaded_by, file_path, folder_id, upload_time) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            file.filename,
            file.original_name,
            file.file_size,
            file.mime_type,
            file.uploaded_by,
            file.file_path,
            file.folder_id,
            now
        ],
    )?;
    file.id = tx.last_insert_rowid() as u64;
    file.upload_time = now;
    Ok(file)
}

pub fn get_file(tx: &Transaction, id: u64) -> Result<Option<FileInfo>> {
    let sql = format!("{SELECT_FILE} WHERE id = ?");
    let mut stmt = tx.prepare(&sql)?;
    let file = stmt.query_row(params![id], file_from_row).optional()?;
    Ok(file)
}

pub fn list_files(tx: &Transaction) -> Result<Vec<FileInfo>> {
    let sql = format!("{SELECT_FILE} ORDER BY upload_time DESC, id DESC");
    let mut stmt = tx.prepare(&sql)?;
    let rows = stmt.query_map([], file_from_row)?;

    let mut files = Vec::new();
    for row in rows {
        files.push(row?);
    }
    Ok(files)
}

pub fn move_file(tx: &Transaction, id: u64, folder_id: Option<u64>) -> Result<bool> {
    let count = tx.execute(
        "UPDATE file SET folder_id = ? WHERE id = ?",
        params![folder_id, id],
    )?;
    Ok(count > 0)
}

pub fn delete_file(tx: &Transaction, id: u64) -> Result<bool> {
    let count = tx.execute("DELETE FROM file WHERE id = ?", params![id])?;
    Ok(count > 0)
}
