use anyhow::Result;

use super::policy::ActionPolicy;
use super::{Authorizer, AuthzRequest, AuthzResponse};

/// Superuser roles pass unconditionally. No stored rule can take this away.
pub struct BypassAuthorizer;

impl BypassAuthorizer {
    pub fn new() -> Self {
        Self
    }
}

impl Authorizer for BypassAuthorizer {
    fn authorize_request(
        &self,
        req: &AuthzRequest,
        policy: &ActionPolicy,
    ) -> Result<AuthzResponse> {
        if policy.bypass.contains(&req.role) {
            return Ok(AuthzResponse::Ok);
        }

        Ok(AuthzResponse::Continue)
    }
}
