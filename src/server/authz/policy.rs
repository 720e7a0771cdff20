use std::collections::{BTreeSet, HashMap};
use std::fmt;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::types::permission::ActionKey;
use crate::types::user::normalize_role;

use super::config::{ActionOverride, AuthzConfig};

/// Roles that pass every check unless an operator narrows them per action.
pub const SUPERUSER_ROLES: [&str; 2] = ["chair", "admin"];

/// Budget operations are open to the treasury and the board.
pub const TREASURER_TIER: [&str; 5] = ["treasurer", "subtreasurer", "chair", "vice chair", "admin"];

/// Board positions allowed to edit the headline numbers.
pub const METRICS_EDITORS: [&str; 4] = ["chair", "vice chair", "secretary", "admin"];

/// How roles outside the bypass set obtain an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Grant {
    /// Looked up in the permission store on every decision.
    Store,
    /// Hard-wired role list.
    Fixed(BTreeSet<String>),
    /// Any signed-in actor.
    Authenticated,
    /// Bypass roles only.
    Nobody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantKind {
    Store,
    Fixed,
    Authenticated,
    Nobody,
}

impl Grant {
    pub fn kind(&self) -> GrantKind {
        match self {
            Grant::Store => GrantKind::Store,
            Grant::Fixed(_) => GrantKind::Fixed,
            Grant::Authenticated => GrantKind::Authenticated,
            Grant::Nobody => GrantKind::Nobody,
        }
    }
}

impl fmt::Display for GrantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GrantKind::Store => "store",
            GrantKind::Fixed => "fixed",
            GrantKind::Authenticated => "authenticated",
            GrantKind::Nobody => "nobody",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionPolicy {
    pub bypass: BTreeSet<String>,
    pub grant: Grant,
}

impl ActionPolicy {
    pub fn default_for(action: ActionKey) -> Self {
        let grant = match action {
            ActionKey::EditMetrics => Grant::Fixed(role_set(METRICS_EDITORS)),
            ActionKey::CreateEvent | ActionKey::DeleteEvents | ActionKey::AddMembers => {
                Grant::Store
            }
            ActionKey::EditBudget | ActionKey::AllocateBudget | ActionKey::ManageForums => {
                Grant::Fixed(role_set(TREASURER_TIER))
            }
            ActionKey::ManageFolders
            | ActionKey::ManageFiles
            | ActionKey::PostAnnouncements
            | ActionKey::DeleteAnnouncements => Grant::Authenticated,
            ActionKey::ManagePermissions => Grant::Nobody,
        };
        Self {
            bypass: role_set(SUPERUSER_ROLES),
            grant,
        }
    }

    /// Whether the permission store decides this action.
    pub fn is_configurable(&self) -> bool {
        self.grant == Grant::Store
    }

    fn apply(&mut self, action: ActionKey, ovr: &ActionOverride) -> Result<()> {
        if let Some(bypass) = ovr.bypass.as_ref() {
            self.bypass = role_set(bypass);
        }

        let roles = ovr.roles.as_ref().map(role_set);
        let kind = ovr.grant.unwrap_or_else(|| self.grant.kind());
        self.grant = match (kind, roles) {
            (GrantKind::Fixed, Some(roles)) => {
                if roles.is_empty() {
                    bail!("fixed grant for '{action}' needs at least one role");
                }
                Grant::Fixed(roles)
            }
            (GrantKind::Fixed, None) => match &self.grant {
                Grant::Fixed(roles) => Grant::Fixed(roles.clone()),
                _ => bail!("fixed grant for '{action}' needs a roles list"),
            },
            (_, Some(_)) => bail!("roles for '{action}' only apply to a fixed grant"),
            (GrantKind::Store, None) => Grant::Store,
            (GrantKind::Authenticated, None) => Grant::Authenticated,
            (GrantKind::Nobody, None) => Grant::Nobody,
        };
        Ok(())
    }
}

/// The consolidated per-action policy, built once at startup.
#[derive(Debug, Clone)]
pub struct PolicyTable {
    policies: HashMap<ActionKey, ActionPolicy>,
}

impl PolicyTable {
    pub fn new(cfg: &AuthzConfig) -> Result<Self> {
        let mut policies: HashMap<ActionKey, ActionPolicy> = ActionKey::ALL
            .into_iter()
            .map(|action| (action, ActionPolicy::default_for(action)))
            .collect();

        for (key, ovr) in cfg.actions.iter() {
            let action: ActionKey = key.parse()?;
            if action == ActionKey::ManagePermissions {
                bail!("the policy of '{action}' cannot be overridden");
            }
            let policy = policies
                .get_mut(&action)
                .with_context(|| format!("no policy for action '{action}'"))?;
            policy
                .apply(action, ovr)
                .with_context(|| format!("invalid override for action '{action}'"))?;
        }

        Ok(Self { policies })
    }

    pub fn get(&self, action: ActionKey) -> Result<&ActionPolicy> {
        self.policies
            .get(&action)
            .with_context(|| format!("no policy for action '{action}'"))
    }
}

fn role_set<I, S>(roles: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    roles
        .into_iter()
        .map(|role| normalize_role(role.as_ref()))
        .filter(|role| !role.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::config::CommonConfig;

    use super::*;

    fn override_cfg(key: &str, ovr: ActionOverride) -> AuthzConfig {
        let mut actions = BTreeMap::new();
        actions.insert(key.to_string(), ovr);
        AuthzConfig { actions }
    }

    #[test]
    fn test_default_table() {
        let table = PolicyTable::new(&AuthzConfig::default()).unwrap();

        for action in ActionKey::ALL {
            let policy = table.get(action).unwrap();
            assert!(policy.bypass.contains("chair"));
            assert!(policy.bypass.contains("admin"));
        }

        assert!(table.get(ActionKey::CreateEvent).unwrap().is_configurable());
        assert!(table.get(ActionKey::DeleteEvents).unwrap().is_configurable());
        assert!(table.get(ActionKey::AddMembers).unwrap().is_configurable());
        assert!(!table.get(ActionKey::EditMetrics).unwrap().is_configurable());
        assert_eq!(
            table.get(ActionKey::ManagePermissions).unwrap().grant,
            Grant::Nobody
        );

        match &table.get(ActionKey::EditBudget).unwrap().grant {
            Grant::Fixed(roles) => {
                assert_eq!(roles.len(), 5);
                assert!(roles.contains("subtreasurer"));
                assert!(roles.contains("vice chair"));
            }
            grant => panic!("unexpected grant {grant:?}"),
        }
    }

    #[test]
    fn test_override() {
        let cfg = override_cfg(
            "edit_metrics",
            ActionOverride {
                grant: Some(GrantKind::Store),
                ..Default::default()
            },
        );
        let table = PolicyTable::new(&cfg).unwrap();
        assert!(table.get(ActionKey::EditMetrics).unwrap().is_configurable());

        let cfg = override_cfg(
            "manage_files",
            ActionOverride {
                bypass: Some(vec![String::from(" Admin ")]),
                grant: Some(GrantKind::Fixed),
                roles: Some(vec![String::from("Secretary"), String::from(" ")]),
            },
        );
        let table = PolicyTable::new(&cfg).unwrap();
        let policy = table.get(ActionKey::ManageFiles).unwrap();
        assert_eq!(policy.bypass, role_set(["admin"]));
        assert_eq!(policy.grant, Grant::Fixed(role_set(["secretary"])));

        // Keeping the fixed kind but swapping the list
        let cfg = override_cfg(
            "edit_budget",
            ActionOverride {
                roles: Some(vec![String::from("treasurer")]),
                ..Default::default()
            },
        );
        let table = PolicyTable::new(&cfg).unwrap();
        assert_eq!(
            table.get(ActionKey::EditBudget).unwrap().grant,
            Grant::Fixed(role_set(["treasurer"]))
        );
    }

    #[test]
    fn test_invalid_override() {
        let mut cfg = override_cfg(
            "manage_permissions",
            ActionOverride {
                grant: Some(GrantKind::Store),
                ..Default::default()
            },
        );
        assert!(PolicyTable::new(&cfg).is_err());
        assert!(cfg.complete(&crate::config::PathSet::new_test()).is_err());

        let cfg = override_cfg("launch_rockets", ActionOverride::default());
        assert!(PolicyTable::new(&cfg).is_err());

        let cfg = override_cfg(
            "create_event",
            ActionOverride {
                grant: Some(GrantKind::Fixed),
                ..Default::default()
            },
        );
        assert!(PolicyTable::new(&cfg).is_err());

        let cfg = override_cfg(
            "create_event",
            ActionOverride {
                roles: Some(vec![String::from("member")]),
                ..Default::default()
            },
        );
        assert!(PolicyTable::new(&cfg).is_err());
    }
}
