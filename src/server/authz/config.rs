use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::config::{CommonConfig, PathSet};

use super::policy::{GrantKind, PolicyTable};

/// Authorization related configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuthzConfig {
    /// Per-action policy overrides, keyed by action key. Unset fields keep the
    /// built-in policy. `manage_permissions` cannot be overridden.
    ///
    /// ```toml
    /// [authz.actions.edit_metrics]
    /// grant = "store"
    /// ```
    #[serde(default = "AuthzConfig::default_actions")]
    pub actions: BTreeMap<String, ActionOverride>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ActionOverride {
    /// Roles that are always allowed, replacing the default `chair`, `admin`.
    #[serde(default)]
    pub bypass: Option<Vec<String>>,

    /// One of `store`, `fixed`, `authenticated`, `nobody`.
    #[serde(default)]
    pub grant: Option<GrantKind>,

    /// Role list of a `fixed` grant.
    #[serde(default)]
    pub roles: Option<Vec<String>>,
}

impl CommonConfig for AuthzConfig {
    fn default() -> Self {
        Self {
            actions: Self::default_actions(),
        }
    }

    fn complete(&mut self, _ps: &PathSet) -> Result<()> {
        self.actions = self
            .actions
            .iter()
            .map(|(key, ovr)| (key.trim().to_string(), ovr.clone()))
            .collect();
        PolicyTable::new(self)?;
        Ok(())
    }
}

impl AuthzConfig {
    pub fn default_actions() -> BTreeMap<String, ActionOverride> {
        BTreeMap::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overrides() {
        let toml = r#"
            [actions.edit_metrics]
            grant = "store"

            [actions.manage_files]
            grant = "fixed"
            roles = ["secretary", "Chair"]
        "#;
        let mut cfg: AuthzConfig = toml::from_str(toml).unwrap();
        cfg.complete(&PathSet::new_test()).unwrap();
        assert_eq!(cfg.actions.len(), 2);
        assert_eq!(
            cfg.actions["edit_metrics"].grant,
            Some(GrantKind::Store)
        );

        let toml = r#"
            [actions.edit_metrics]
            grant = "everyone"
        "#;
        assert!(toml::from_str::<AuthzConfig>(toml).is_err());
    }
}
