use anyhow::Result;
use log::debug;

use crate::types::permission::ActionKey;

use super::policy::{ActionPolicy, PolicyTable};
use super::union::UnionAuthorizer;
use super::{Authorizer, AuthzRequest, AuthzResponse};

/// Entry point of every access decision: resolves the action's policy and runs
/// the authorizers in order. A chain that ends undecided denies.
pub struct ChainAuthorizer {
    table: PolicyTable,
    authorizers: Vec<UnionAuthorizer>,
}

impl ChainAuthorizer {
    pub fn new(table: PolicyTable, authorizers: Vec<UnionAuthorizer>) -> Self {
        Self { table, authorizers }
    }

    pub fn authorize(&self, req: &AuthzRequest) -> Result<AuthzResponse> {
        if req.role.is_empty() {
            return Ok(AuthzResponse::Unauthorized);
        }

        let policy = self.table.get(req.action)?;
        for authorizer in self.authorizers.iter() {
            match authorizer.authorize_request(req, policy)? {
                AuthzResponse::Ok => return Ok(AuthzResponse::Ok),
                AuthzResponse::Continue => continue,
                AuthzResponse::Unauthorized => {
                    debug!("Role '{}' denied for '{}'", req.role, req.action);
                    return Ok(AuthzResponse::Unauthorized);
                }
            }
        }

        debug!("No authorizer decided '{}' for '{}', deny", req.action, req.role);
        Ok(AuthzResponse::Unauthorized)
    }

    /// `true` only when the role may perform the action. Storage failures are
    /// returned as errors, never as an allow.
    pub fn is_allowed(&self, role: &str, action: ActionKey) -> Result<bool> {
        let resp = self.authorize(&AuthzRequest::new(action, role))?;
        Ok(resp == AuthzResponse::Ok)
    }

    pub fn policy(&self, action: ActionKey) -> Result<&ActionPolicy> {
        self.table.get(action)
    }
}
