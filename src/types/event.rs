use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::require_field;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: u64,
    pub title: String,
    pub date: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub description: String,
    pub create_time: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub date: String,

    #[serde(rename = "type", default = "CreateEventRequest::default_kind")]
    pub kind: String,

    #[serde(default)]
    pub description: String,
}

impl CreateEventRequest {
    pub fn default_kind() -> String {
        String::from("general")
    }

    /// Normalizes the request into a new event. `date` must be `YYYY-MM-DD`.
    pub fn into_event(self) -> Result<Event> {
        let title = require_field("title", &self.title)?;
        let date = require_field("date", &self.date)?;
        NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .with_context(|| format!("invalid date '{date}', expect YYYY-MM-DD"))?;

        let kind = match self.kind.trim() {
            "" => Self::default_kind(),
            kind => kind.to_lowercase(),
        };

        Ok(Event {
            id: 0,
            title,
            date,
            kind,
            description: self.description.trim().to_string(),
            create_time: 0,
        })
    }
}
