pub mod announcement;
pub mod budget;
pub mod event;
pub mod file;
pub mod folder;
pub mod healthz;
pub mod member;
pub mod metrics;
pub mod permission;
pub mod response;
pub mod token;
pub mod user;

use anyhow::{bail, Result};

/// Trims `value` and rejects it when nothing is left.
pub fn require_field(name: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        bail!("{name} is required");
    }
    Ok(value.to_string())
}
