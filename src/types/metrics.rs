use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub total_members: String,
    pub upcoming_events: String,
    pub active_projects: String,
    pub update_time: u64,
}

impl DashboardMetrics {
    /// Values shown before anyone has edited the dashboard.
    pub fn initial() -> Self {
        Self {
            total_members: String::from("17"),
            upcoming_events: String::from("3"),
            active_projects: String::from("5"),
            update_time: 0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatchMetricsRequest {
    pub total_members: Option<String>,
    pub upcoming_events: Option<String>,
    pub active_projects: Option<String>,
}

impl PatchMetricsRequest {
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("total_members", &self.total_members),
            ("upcoming_events", &self.upcoming_events),
            ("active_projects", &self.active_projects),
        ];
        if fields.iter().all(|(_, value)| value.is_none()) {
            bail!("at least one metric is required");
        }
        for (name, value) in fields {
            if let Some(value) = value {
                if value.trim().is_empty() {
                    bail!("{name} cannot be empty");
                }
            }
        }
        Ok(())
    }

    pub fn apply(self, metrics: &mut DashboardMetrics) {
        if let Some(value) = self.total_members {
            metrics.total_members = value.trim().to_string();
        }
        if let Some(value) = self.upcoming_events {
            metrics.upcoming_events = value.trim().to_string();
        }
        if let Some(value) = self.active_projects {
            metrics.active_projects = value.trim().to_string();
        }
    }
}
