use anyhow::Result;

use super::policy::{ActionPolicy, Grant};
use super::{Authorizer, AuthzRequest, AuthzResponse};

/// Decides every grant that does not need the permission store.
pub struct FixedAuthorizer;

impl FixedAuthorizer {
    pub fn new() -> Self {
        Self
    }
}

impl Authorizer for FixedAuthorizer {
    fn authorize_request(
        &self,
        req: &AuthzRequest,
        policy: &ActionPolicy,
    ) -> Result<AuthzResponse> {
        let resp = match &policy.grant {
            Grant::Store => AuthzResponse::Continue,
            Grant::Fixed(roles) if roles.contains(&req.role) => AuthzResponse::Ok,
            Grant::Fixed(_) => AuthzResponse::Unauthorized,
            Grant::Authenticated => AuthzResponse::Ok,
            Grant::Nobody => AuthzResponse::Unauthorized,
        };
        Ok(resp)
    }
}
