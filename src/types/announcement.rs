use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use super::require_field;

pub const PRIORITIES: [&str; 4] = ["low", "normal", "high", "urgent"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub author: String,
    pub priority: String,
    pub create_time: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostAnnouncementRequest {
    pub title: String,
    pub content: String,

    #[serde(default = "PostAnnouncementRequest::default_priority")]
    pub priority: String,
}

impl PostAnnouncementRequest {
    pub fn default_priority() -> String {
        String::from("normal")
    }

    /// The author always comes from the session, never from the body.
    pub fn into_announcement(self, author: &str) -> Result<Announcement> {
        let priority = self.priority.trim().to_lowercase();
        if !PRIORITIES.contains(&priority.as_str()) {
            bail!(
                "invalid priority '{priority}', expect one of {}",
                PRIORITIES.join(", ")
            );
        }
        Ok(Announcement {
            id: 0,
            title: require_field("title", &self.title)?,
            content: require_field("content", &self.content)?,
            author: author.to_string(),
            priority,
            create_time: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_announcement_request() {
        let req: PostAnnouncementRequest =
            serde_json::from_str(r#"{"title":"AGM","content":"Saturday 10am","author":"someone else"}"#)
                .unwrap();
        let item = req.into_announcement("Chris").unwrap();
        assert_eq!(item.author, "Chris");
        assert_eq!(item.priority, "normal");

        let req = PostAnnouncementRequest {
            title: String::from("AGM"),
            content: String::from("Saturday"),
            priority: String::from("critical"),
        };
        assert!(req.into_announcement("Chris").is_err());
    }
}
