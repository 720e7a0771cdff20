use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::require_field;

/// Metadata of an uploaded document. The bytes themselves live outside the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    pub id: u64,
    pub filename: String,
    pub original_name: String,
    pub file_size: u64,
    pub mime_type: String,
    pub uploaded_by: String,
    pub file_path: String,
    pub folder_id: Option<u64>,
    pub upload_time: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterFileRequest {
    pub filename: String,
    pub original_name: String,
    pub file_size: u64,

    #[serde(default = "RegisterFileRequest::default_mime_type")]
    pub mime_type: String,

    pub file_path: String,

    #[serde(default)]
    pub folder_id: Option<u64>,
}

impl RegisterFileRequest {
    pub fn default_mime_type() -> String {
        String::from("application/octet-stream")
    }

    pub fn into_file(self, uploaded_by: &str) -> Result<FileInfo> {
        Ok(FileInfo {
            id: 0,
            filename: require_field("filename", &self.filename)?,
            original_name: require_field("original_name", &self.original_name)?,
            file_size: self.file_size,
            mime_type: require_field("mime_type", &self.mime_type)?,
            uploaded_by: uploaded_by.to_string(),
            file_path: require_field("file_path", &self.file_path)?,
            folder_id: self.folder_id,
            upload_time: 0,
        })
    }
}

/// Moves a file into a folder, or back to the root when `folder_id` is null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveFileRequest {
    pub folder_id: Option<u64>,
}
