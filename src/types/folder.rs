use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use super::require_field;

pub const DEFAULT_FOLDER_COLOR: &str = "#3B82F6";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: u64,
    pub name: String,
    pub color: String,
    pub parent_id: Option<u64>,
    pub created_by: String,
    pub create_time: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolderRequest {
    pub name: String,

    #[serde(default)]
    pub color: Option<String>,

    #[serde(default)]
    pub parent_id: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFolderRequest {
    pub name: Option<String>,
    pub color: Option<String>,
}

fn check_color(color: &str) -> Result<String> {
    let color = color.trim();
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        bail!("invalid color '{color}', expect #RRGGBB");
    }
    Ok(color.to_uppercase())
}

impl CreateFolderRequest {
    pub fn validate(&mut self) -> Result<()> {
        self.name = require_field("name", &self.name)?;
        let color = match self.color.as_deref() {
            Some(color) if !color.trim().is_empty() => check_color(color)?,
            _ => String::from(DEFAULT_FOLDER_COLOR),
        };
        self.color = Some(color);
        Ok(())
    }
}

impl UpdateFolderRequest {
    pub fn validate(&mut self) -> Result<()> {
        if self.name.is_none() && self.color.is_none() {
            bail!("name or color is required");
        }
        if let Some(name) = self.name.as_deref() {
            self.name = Some(require_field("name", name)?);
        }
        if let Some(color) = self.color.as_deref() {
            self.color = Some(check_color(color)?);
        }
        Ok(())
    }

    pub fn apply(self, folder: &mut Folder) {
        if let Some(name) = self.name {
            folder.name = name;
        }
        if let Some(color) = self.color {
            folder.color = color;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_folder_request() {
        let mut req = CreateFolderRequest {
            name: String::from(" Minutes "),
            color: None,
            parent_id: None,
        };
        req.validate().unwrap();
        assert_eq!(req.name, "Minutes");
        assert_eq!(req.color.as_deref(), Some(DEFAULT_FOLDER_COLOR));

        let mut req = CreateFolderRequest {
            name: String::from("Receipts"),
            color: Some(String::from("#10b981")),
            parent_id: None,
        };
        req.validate().unwrap();
        assert_eq!(req.color.as_deref(), Some("#10B981"));

        let mut req = CreateFolderRequest {
            name: String::from("Receipts"),
            color: Some(String::from("green")),
            parent_id: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_folder_request() {
        let mut req = UpdateFolderRequest::default();
        assert!(req.validate().is_err());

        let mut req = UpdateFolderRequest {
            name: Some(String::from("Archive")),
            color: None,
        };
        req.validate().unwrap();

        let mut folder = Folder {
            id: 1,
            name: String::from("Old"),
            color: String::from(DEFAULT_FOLDER_COLOR),
            parent_id: None,
            created_by: String::from("Ann"),
            create_time: 0,
        };
        req.apply(&mut folder);
        assert_eq!(folder.name, "Archive");
        assert_eq!(folder.color, DEFAULT_FOLDER_COLOR);
    }
}
