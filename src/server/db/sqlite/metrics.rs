use anyhow::Result;
use chrono::Local;
use rusqlite::{params, Connection, OptionalExtension, Transaction};

use crate::types::metrics::DashboardMetrics;

// Single-row table, the row always has id 1
const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS dashboard_metrics (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    total_members TEXT NOT NULL,
    upcoming_events TEXT NOT NULL,
    active_projects TEXT NOT NULL,
    update_time INTEGER NOT NULL
);
"#;

pub fn create_metrics_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLES)?;
    Ok(())
}

pub fn get_metrics(tx: &Transaction) -> Result<Option<DashboardMetrics>> {
    let mut stmt = tx.prepare(
        "SELECT total_members, upcoming_events, active_projects, update_time FROM dashboard_metrics WHERE id = 1",
    )?;
    let metrics = stmt
        .query_row([], |row| {
            Ok(DashboardMetrics {
                total_members: row.get(0)?,
                upcoming_events: row.get(1)?,
                active_projects: row.get(2)?,
                update_time: row.get(3)?,
            })
        })
        .optional()?;
    Ok(metrics)
}

pub fn save_metrics(tx: &Transaction, mut metrics: DashboardMetrics) -> Result<DashboardMetrics> {
    let now = Local::now().timestamp() as u64;
    tx.execute(
        r#"
INSERT INTO dashboard_metrics (id, total_members, upcoming_events, active_projects, update_time)
VALUES (1, ?, ?, ?, ?)
ON CONFLICT(id) DO UPDATE SET
    total_members = excluded.total_members,
    upcoming_events = excluded.upcoming_events,
    active_projects = excluded.active_projects,
    update_time = excluded.update_time
"#,
        params![
            metrics.total_members,
            metrics.upcoming_events,
            metrics.active_projects,
            now
        ],
    )?;
    metrics.update_time = now;
    Ok(metrics)
}
