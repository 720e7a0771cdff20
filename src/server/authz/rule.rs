use std::sync::Arc;

use anyhow::{Context, Result};

use crate::server::db::Database;

use super::policy::{ActionPolicy, Grant};
use super::{Authorizer, AuthzRequest, AuthzResponse};

/// Looks the action up in the permission store. A missing rule denies.
///
/// The rule is read on every call, so an upsert takes effect for the very next
/// request.
pub struct RuleAuthorizer {
    db: Arc<Database>,
}

impl RuleAuthorizer {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

impl Authorizer for RuleAuthorizer {
    fn authorize_request(
        &self,
        req: &AuthzRequest,
        policy: &ActionPolicy,
    ) -> Result<AuthzResponse> {
        if policy.grant != Grant::Store {
            return Ok(AuthzResponse::Continue);
        }

        let key = req.action.as_str();
        let rule = self
            .db
            .with_transaction(|tx| tx.get_permission(key))
            .with_context(|| format!("load permission rule '{key}'"))?;

        match rule {
            Some(rule) if rule.allows(&req.role) => Ok(AuthzResponse::Ok),
            _ => Ok(AuthzResponse::Unauthorized),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::types::permission::{ActionKey, PermissionRule};

    use super::*;

    #[test]
    fn test_rule_authorizer() {
        let db = Arc::new(Database::new_test());
        let authorizer = RuleAuthorizer::new(db.clone());
        let policy = ActionPolicy::default_for(ActionKey::DeleteEvents);

        let req = AuthzRequest::new(ActionKey::DeleteEvents, "Vice Chair");

        // No rule stored yet
        assert_eq!(
            authorizer.authorize_request(&req, &policy).unwrap(),
            AuthzResponse::Unauthorized
        );

        db.with_transaction(|tx| {
            tx.upsert_permission(PermissionRule::new("delete_events", ["vice chair"]))
        })
        .unwrap();
        assert_eq!(
            authorizer.authorize_request(&req, &policy).unwrap(),
            AuthzResponse::Ok
        );

        let req = AuthzRequest::new(ActionKey::DeleteEvents, "member");
        assert_eq!(
            authorizer.authorize_request(&req, &policy).unwrap(),
            AuthzResponse::Unauthorized
        );

        // Not a store-backed action
        let policy = ActionPolicy::default_for(ActionKey::EditBudget);
        let req = AuthzRequest::new(ActionKey::EditBudget, "vice chair");
        assert_eq!(
            authorizer.authorize_request(&req, &policy).unwrap(),
            AuthzResponse::Continue
        );
    }
}
