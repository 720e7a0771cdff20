use std::collections::{BTreeMap, BTreeSet};

use log::{debug, info, warn};

use crate::types::permission::PermissionRule;
use crate::types::user::normalize_role;

use super::{PermissionApi, RequestError};

/// Client side copy of the permission table.
///
/// The snapshot is only as fresh as the last [`refresh`](Self::refresh). Upserts
/// on the server replace the whole role set, so toggling from a stale snapshot
/// silently drops whatever another operator wrote in between. Call `refresh`
/// before a batch of edits when that matters.
pub struct PermissionBoard<A: PermissionApi> {
    api: A,
    snapshot: Option<BTreeMap<String, BTreeSet<String>>>,
}

impl<A: PermissionApi> PermissionBoard<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            snapshot: None,
        }
    }

    /// Replaces the snapshot with the server's table.
    pub async fn refresh(&mut self) -> Result<&BTreeMap<String, BTreeSet<String>>, RequestError> {
        let rules = self.api.list_rules().await?;
        debug!("Loaded {} permission rules", rules.len());
        let snapshot = rules
            .into_iter()
            .map(|rule| (rule.action_key, rule.allowed_roles))
            .collect();
        Ok(self.snapshot.insert(snapshot))
    }

    pub fn invalidate(&mut self) {
        self.snapshot = None;
    }

    pub fn snapshot(&self) -> Option<&BTreeMap<String, BTreeSet<String>>> {
        self.snapshot.as_ref()
    }

    /// The snapshot, fetched first when there is none.
    pub async fn rules(&mut self) -> Result<&BTreeMap<String, BTreeSet<String>>, RequestError> {
        if self.snapshot.is_none() {
            self.refresh().await?;
        }
        self.snapshot
            .as_ref()
            .ok_or(RequestError::Unexpected("permission snapshot is missing"))
    }

    /// Flips `role` in the allowed set of `action_key` and writes the result.
    ///
    /// The new set is applied to the snapshot before the server answers. If the
    /// write fails the snapshot is reloaded from the server, or restored to what
    /// it was before the toggle when that reload fails too. Returns whether the
    /// role is now allowed.
    pub async fn toggle(&mut self, action_key: &str, role: &str) -> Result<bool, RequestError> {
        let role = normalize_role(role);
        if role.is_empty() {
            return Err(RequestError::Client(String::from("role cannot be empty")));
        }

        let previous = self.rules().await?.clone();
        let mut roles = previous.get(action_key).cloned().unwrap_or_default();
        let enabled = if roles.contains(&role) {
            roles.remove(&role);
            false
        } else {
            roles.insert(role.clone());
            true
        };

        if let Some(snapshot) = self.snapshot.as_mut() {
            snapshot.insert(action_key.to_string(), roles.clone());
        }

        match self
            .api
            .upsert_rule(action_key, roles.into_iter().collect())
            .await
        {
            Ok(rule) => {
                info!(
                    "Role '{role}' {} for '{action_key}'",
                    if enabled { "granted" } else { "revoked" }
                );
                self.confirm(rule);
                Ok(enabled)
            }
            Err(err) => {
                warn!("Toggle '{role}' on '{action_key}' failed, rolling back: {err}");
                if let Err(refresh_err) = self.refresh().await {
                    warn!("Reload permissions failed, restoring previous snapshot: {refresh_err}");
                    self.snapshot = Some(previous);
                }
                Err(err)
            }
        }
    }

    fn confirm(&mut self, rule: PermissionRule) {
        if let Some(snapshot) = self.snapshot.as_mut() {
            snapshot.insert(rule.action_key, rule.allowed_roles);
        }
    }
}
