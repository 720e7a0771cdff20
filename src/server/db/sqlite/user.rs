use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Transaction};

use crate::server::db::UserRecord;

const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS user (
    email TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    role TEXT NOT NULL,
    hash TEXT NOT NULL,
    salt TEXT NOT NULL,
    last_seen INTEGER NOT NULL DEFAULT 0,
    create_time INTEGER NOT NULL
);
"#;

pub fn create_user_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLES)?;
    Ok(())
}

pub fn create_user(tx: &Transaction, user: &UserRecord) -> Result<()> {
    tx.execute(
        "INSERT INTO user (email, name, role, hash, salt, last_seen, create_time) VALUES (?, ?, ?, ?, ?, ?, ?)",
        params![
            user.email,
            user.name,
            user.role,
            user.hash,
            user.salt,
            user.last_seen,
            user.create_time
        ],
    )?;
    Ok(())
}

pub fn get_user(tx: &Transaction, email: &str) -> Result<Option<UserRecord>> {
    let mut stmt = tx.prepare(
        "SELECT email, name, role, hash, salt, last_seen, create_time FROM user WHERE email = ?",
    )?;
    let user = stmt
        .query_row(params![email], |row| {
            Ok(UserRecord {
                email: row.get(0)?,
                name: row.get(1)?,
                role: row.get(2)?,
                hash: row.get(3)?,
                salt: row.get(4)?,
                last_seen: row.get(5)?,
                create_time: row.get(6)?,
            })
        })
        .optional()?;
    Ok(user)
}

pub fn is_user_exists(tx: &Transaction, email: &str) -> Result<bool> {
    let mut stmt = tx.prepare("SELECT COUNT(*) FROM user WHERE email = ?")?;
    let count: i64 = stmt.query_row(params![email], |row| row.get(0))?;
    Ok(count > 0)
}

pub fn update_user_last_seen(tx: &Transaction, email: &str, time: u64) -> Result<()> {
    tx.execute(
        "UPDATE user SET last_seen = ? WHERE email = ?",
        params![time, email],
    )?;
    Ok(())
}
