use anyhow::Result;
use chrono::Local;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};

use crate::types::event::Event;

const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS event (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    date TEXT NOT NULL,
    type TEXT NOT NULL,
    description TEXT NOT NULL,
    create_time INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_event_date ON event(date);
"#;

const SELECT_EVENT: &str = "SELECT id, title, date, type, description, create_time FROM event";

pub fn create_event_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLES)?;
    Ok(())
}

fn event_from_row(row: &Row) -> rusqlite::Result<Event> {
    Ok(Event {
        id: row.get(0)?,
        title: row.get(1)?,
        date: row.get(2)?,
        kind: row.get(3)?,
        description: row.get(4)?,
        create_time: row.get(5)?,
    })
}

pub fn create_event(tx: &Transaction, mut event: Event) -> Result<Event> {
    let now = Local::now().timestamp() as u64;
    tx.execute(
        "INSERT INTO event (title, date, type, description, create_time) VALUES (?, ?, ?, ?, ?)",
        params![event.title, event.date, event.kind, event.description, now],
    )?;
    event.id = tx.last_insert_rowid() as u64;
    event.create_time = now;
    Ok(event)
}

pub fn get_event(tx: &Transaction, id: u64) -> Result<Option<Event>> {
    let sql = format!("{SELECT_EVENT} WHERE id = ?");
    let mut stmt = tx.prepare(&sql)?;
    let event = stmt.query_row(params![id], event_from_row).optional()?;
    Ok(event)
}

pub fn list_events(tx: &Transaction) -> Result<Vec<Event>> {
    let sql = format!("{SELECT_EVENT} ORDER BY date, id");
    let mut stmt = tx.prepare(&sql)?;
    let rows = stmt.query_map([], event_from_row)?;

    let mut events = Vec::new();
    for row in rows {
        events.push(row?);
    }
    Ok(events)
}

pub fn delete_event(tx: &Transaction, id: u64) -> Result<bool> {
    let count = tx.execute("DELETE FROM event WHERE id = ?", params![id])?;
    Ok(count > 0)
}
