use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::user::normalize_role;

/// Every guarded operation in the dashboard. Endpoints name their key at compile
/// time, so the set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKey {
    EditMetrics,
    CreateEvent,
    DeleteEvents,
    AddMembers,
    EditBudget,
    AllocateBudget,
    ManageForums,
    ManageFolders,
    ManageFiles,
    PostAnnouncements,
    DeleteAnnouncements,
    ManagePermissions,
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown action key '{0}'")]
pub struct ParseActionKeyError(pub String);

impl ActionKey {
    pub const ALL: [ActionKey; 12] = [
        ActionKey::EditMetrics,
        ActionKey::CreateEvent,
        ActionKey::DeleteEvents,
        ActionKey::AddMembers,
        ActionKey::EditBudget,
        ActionKey::AllocateBudget,
        ActionKey::ManageForums,
        ActionKey::ManageFolders,
        ActionKey::ManageFiles,
        ActionKey::PostAnnouncements,
        ActionKey::DeleteAnnouncements,
        ActionKey::ManagePermissions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKey::EditMetrics => "edit_metrics",
            ActionKey::CreateEvent => "create_event",
            ActionKey::DeleteEvents => "delete_events",
            ActionKey::AddMembers => "add_members",
            ActionKey::EditBudget => "edit_budget",
            ActionKey::AllocateBudget => "allocate_budget",
            ActionKey::ManageForums => "manage_forums",
            ActionKey::ManageFolders => "manage_folders",
            ActionKey::ManageFiles => "manage_files",
            ActionKey::PostAnnouncements => "post_announcements",
            ActionKey::DeleteAnnouncements => "delete_announcements",
            ActionKey::ManagePermissions => "manage_permissions",
        }
    }
}

impl FromStr for ActionKey {
    type Err = ParseActionKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ParseActionKeyError(s.to_string()))
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of roles allowed to perform one action, as kept by the permission store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionRule {
    pub action_key: String,
    pub allowed_roles: BTreeSet<String>,

    #[serde(default)]
    pub update_time: u64,
}

impl PermissionRule {
    /// Builds a rule with normalized role names. Blank entries are dropped.
    pub fn new<I, S>(action_key: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed_roles = roles
            .into_iter()
            .map(|role| normalize_role(role.as_ref()))
            .filter(|role| !role.is_empty())
            .collect();
        Self {
            action_key: action_key.into(),
            allowed_roles,
            update_time: 0,
        }
    }

    pub fn allows(&self, role: &str) -> bool {
        self.allowed_roles.contains(role)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertRuleRequest {
    pub action_key: String,
    pub allowed_roles: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_key() {
        for key in ActionKey::ALL {
            let parsed: ActionKey = key.as_str().parse().unwrap();
            assert_eq!(parsed, key);
        }
        assert_eq!(
            " delete_events ".parse::<ActionKey>().unwrap(),
            ActionKey::DeleteEvents
        );
        assert_eq!(
            "delete_everything".parse::<ActionKey>(),
            Err(ParseActionKeyError(String::from("delete_everything")))
        );

        let json = serde_json::to_string(&ActionKey::EditMetrics).unwrap();
        assert_eq!(json, r#""edit_metrics""#);
    }

    #[test]
    fn test_permission_rule_normalized() {
        let rule = PermissionRule::new(
            "delete_events",
            ["Vice Chair", " secretary", "", "SECRETARY"],
        );
        assert_eq!(
            rule.allowed_roles,
            ["secretary", "vice chair"]
                .into_iter()
                .map(String::from)
                .collect()
        );
        assert!(rule.allows("vice chair"));
        assert!(!rule.allows("member"));
    }

    #[test]
    fn test_upsert_request_requires_list() {
        let ok: UpsertRuleRequest =
            serde_json::from_str(r#"{"action_key":"create_event","allowed_roles":["member"]}"#)
                .unwrap();
        assert_eq!(ok.allowed_roles, vec!["member"]);

        let bad = serde_json::from_str::<UpsertRuleRequest>(
            r#"{"action_key":"create_event","allowed_roles":"member"}"#,
        );
        assert!(bad.is_err());

        let missing = serde_json::from_str::<UpsertRuleRequest>(r#"{"allowed_roles":[]}"#);
        assert!(missing.is_err());
    }
}
