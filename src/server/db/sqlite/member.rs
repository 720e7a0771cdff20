use anyhow::Result;
use chrono::Local;
use rusqlite::{params, Connection, Transaction};

use crate::server::db::MemberRecord;
use crate::types::member::Member;

const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS member (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    phone TEXT,
    status TEXT NOT NULL,
    joined_date TEXT NOT NULL,
    create_time INTEGER NOT NULL
);
"#;

pub fn create_member_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLES)?;
    Ok(())
}

pub fn create_member(tx: &Transaction, mut member: Member) -> Result<Member> {
    let now = Local::now().timestamp() as u64;
    tx.execute(
        "INSERT INTO member (name, email, phone, status, joined_date, create_time) VALUES (?, ?, ?, ?, ?, ?)",
        params![
            member.name,
            member.email,
            member.phone,
            member.status,
            member.joined_date,
            now
        ],
    )?;
    member.id = tx.last_insert_rowid() as u64;
    member.create_time = now;
    Ok(member)
}

pub fn list_members(tx: &Transaction) -> Result<Vec<MemberRecord>> {
    let mut stmt = tx.prepare(
        r#"
SELECT m.id, m.name, m.email, m.phone, m.status, m.joined_date, m.create_time,
       COALESCE(u.last_seen, 0)
FROM member m LEFT JOIN user u ON u.email = m.email
ORDER BY m.name, m.id
"#,
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(MemberRecord {
            member: Member {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                phone: row.get(3)?,
                status: row.get(4)?,
                joined_date: row.get(5)?,
                create_time: row.get(6)?,
            },
            last_seen: row.get(7)?,
        })
    })?;

    let mut members = Vec::new();
    for row in rows {
        members.push(row?);
    }
    Ok(members)
}
