use std::sync::Arc;

use anyhow::Result;
use log::info;

use crate::server::db::Database;
use crate::types::permission::ActionKey;

use super::bypass::BypassAuthorizer;
use super::chain::ChainAuthorizer;
use super::config::AuthzConfig;
use super::fixed::FixedAuthorizer;
use super::policy::PolicyTable;
use super::rule::RuleAuthorizer;
use super::union::UnionAuthorizer;

pub struct AuthzFactory;

impl AuthzFactory {
    pub fn new() -> Self {
        Self
    }

    /// Chain order is bypass, fixed grants, then the permission store.
    pub fn build_authorizer(&self, cfg: &AuthzConfig, db: Arc<Database>) -> Result<ChainAuthorizer> {
        let table = PolicyTable::new(cfg)?;
        for action in ActionKey::ALL {
            let policy = table.get(action)?;
            info!(
                "Policy '{action}': grant {}, bypass {:?}",
                policy.grant.kind(),
                policy.bypass
            );
        }

        let authorizers = vec![
            UnionAuthorizer::Bypass(BypassAuthorizer::new()),
            UnionAuthorizer::Fixed(FixedAuthorizer::new()),
            UnionAuthorizer::Rule(RuleAuthorizer::new(db)),
        ];

        Ok(ChainAuthorizer::new(table, authorizers))
    }
}
