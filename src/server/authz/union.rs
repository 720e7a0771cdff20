use anyhow::Result;

use super::bypass::BypassAuthorizer;
use super::fixed::FixedAuthorizer;
use super::policy::ActionPolicy;
use super::rule::RuleAuthorizer;
use super::{Authorizer, AuthzRequest, AuthzResponse};

pub enum UnionAuthorizer {
    Bypass(BypassAuthorizer),
    Fixed(FixedAuthorizer),
    Rule(RuleAuthorizer),
}

impl Authorizer for UnionAuthorizer {
    fn authorize_request(
        &self,
        req: &AuthzRequest,
        policy: &ActionPolicy,
    ) -> Result<AuthzResponse> {
        match self {
            UnionAuthorizer::Bypass(authz) => authz.authorize_request(req, policy),
            UnionAuthorizer::Fixed(authz) => authz.authorize_request(req, policy),
            UnionAuthorizer::Rule(authz) => authz.authorize_request(req, policy),
        }
    }
}
