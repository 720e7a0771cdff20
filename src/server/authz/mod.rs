mod bypass;
mod fixed;
mod rule;
mod union;

pub mod chain;
pub mod config;
pub mod factory;
pub mod policy;

use anyhow::Result;

use crate::types::permission::ActionKey;

use self::policy::ActionPolicy;

/// One step of an access decision. Each authorizer looks at the policy of the
/// requested action and either decides or defers to the next one.
pub trait Authorizer: Send + Sync {
    fn authorize_request(&self, req: &AuthzRequest, policy: &ActionPolicy)
        -> Result<AuthzResponse>;
}

#[derive(Debug, Clone)]
pub struct AuthzRequest {
    pub action: ActionKey,

    /// Normalized actor role.
    pub role: String,
}

impl AuthzRequest {
    pub fn new(action: ActionKey, role: &str) -> Self {
        Self {
            action,
            role: crate::types::user::normalize_role(role),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum AuthzResponse {
    /// Access is granted
    Ok,
    /// Defers decision to next authorizer in chain
    Continue,
    /// Access is denied
    Unauthorized,
}
