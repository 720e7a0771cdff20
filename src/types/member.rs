use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use super::require_field;
use super::user::normalize_role;

/// A member counts as active when their last heartbeat is this recent.
pub const PRESENCE_WINDOW_SECS: u64 = 5 * 60;

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_OFFLINE: &str = "offline";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: u64,
    pub name: String,
    pub email: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    pub status: String,
    pub joined_date: String,
    pub create_time: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddMemberRequest {
    pub name: String,
    pub email: String,

    #[serde(default)]
    pub phone: Option<String>,

    pub role: String,
    pub password: String,
}

impl AddMemberRequest {
    pub fn validate(&mut self) -> Result<()> {
        self.name = require_field("name", &self.name)?;
        self.email = require_field("email", &self.email)?.to_lowercase();
        if !self.email.contains('@') {
            bail!("invalid email '{}'", self.email);
        }
        self.role = normalize_role(&self.role);
        if self.role.is_empty() {
            bail!("role is required");
        }
        if self.password.is_empty() {
            bail!("password is required");
        }
        self.phone = self
            .phone
            .take()
            .map(|phone| phone.trim().to_string())
            .filter(|phone| !phone.is_empty());
        Ok(())
    }
}

/// Presence derived from the user's last heartbeat.
pub fn presence_status(last_seen: u64, now: u64) -> &'static str {
    if last_seen > 0 && now.saturating_sub(last_seen) < PRESENCE_WINDOW_SECS {
        STATUS_ACTIVE
    } else {
        STATUS_OFFLINE
    }
}
