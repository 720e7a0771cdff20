use std::collections::BTreeSet;

use anyhow::{Context, Result};
use chrono::Local;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Transaction};

use crate::types::permission::PermissionRule;

// Roles are kept as a JSON array so a rule stays a single row
const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS permission (
    action_key TEXT PRIMARY KEY,
    allowed_roles TEXT NOT NULL,
    update_time INTEGER NOT NULL
);
"#;

pub fn create_permission_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLES)?;
    Ok(())
}

fn decode_roles(action_key: &str, roles: &str) -> Result<BTreeSet<String>> {
    serde_json::from_str(roles)
        .with_context(|| format!("decode allowed roles of permission '{action_key}'"))
}

pub fn list_permissions(tx: &Transaction) -> Result<Vec<PermissionRule>> {
    let mut stmt = tx.prepare(
        "SELECT action_key, allowed_roles, update_time FROM permission ORDER BY action_key",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, u64>(2)?,
        ))
    })?;

    let mut rules = Vec::new();
    for row in rows {
        let (action_key, roles, update_time) = row?;
        let allowed_roles = decode_roles(&action_key, &roles)?;
        rules.push(PermissionRule {
            action_key,
            allowed_roles,
            update_time,
        });
    }
    Ok(rules)
}

pub fn get_permission(tx: &Transaction, action_key: &str) -> Result<Option<PermissionRule>> {
    let mut stmt = tx
        .prepare("SELECT allowed_roles, update_time FROM permission WHERE action_key = ?")?;
    let row = stmt
        .query_row(params![action_key], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, u64>(1)?))
        })
        .optional()?;

    match row {
        Some((roles, update_time)) => Ok(Some(PermissionRule {
            action_key: action_key.to_string(),
            allowed_roles: decode_roles(action_key, &roles)?,
            update_time,
        })),
        None => Ok(None),
    }
}

pub fn upsert_permission(tx: &Transaction, mut rule: PermissionRule) -> Result<PermissionRule> {
    let now = Local::now().timestamp() as u64;
    let roles = serde_json::to_string(&rule.allowed_roles).context("encode allowed roles")?;
    debug!("Upsert permission '{}' with roles {roles}", rule.action_key);
    tx.execute(
        r#"
INSERT INTO permission (action_key, allowed_roles, update_time) VALUES (?, ?, ?)
ON CONFLICT(action_key) DO UPDATE SET
    allowed_roles = excluded.allowed_roles,
    update_time = excluded.update_time
"#,
        params![rule.action_key, roles, now],
    )?;
    rule.update_time = now;
    Ok(rule)
}
