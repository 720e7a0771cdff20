mod bearer_token;
mod chain;
mod cookie;
mod union;

pub mod config;
pub mod factory;
pub mod token;

use actix_web::HttpRequest;
use anyhow::Result;
use log::{debug, warn};

use crate::server::db::Database;
use crate::types::user::normalize_role;

pub trait Authenticator: Send + Sync {
    fn authenticate_request(&self, req: &HttpRequest) -> Result<AuthnResponse>;
}

/// The actor behind a request. Name and role always come from the user table,
/// never from anything the client sends.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthnUserInfo {
    pub email: String,
    pub name: String,

    /// Normalized, never empty.
    pub role: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthnResponse {
    Ok(AuthnUserInfo),
    /// No credential of this kind in the request
    Continue,
    Unauthenticated,
}

/// Loads the session actor for a validated token subject.
fn resolve_user(db: &Database, email: &str) -> Result<AuthnResponse> {
    let record = match db.with_transaction(|tx| tx.get_user(email))? {
        Some(record) => record,
        None => {
            debug!("Token subject '{email}' has no user record");
            return Ok(AuthnResponse::Unauthenticated);
        }
    };

    let role = normalize_role(&record.role);
    if role.is_empty() {
        warn!("User '{email}' has no role, rejecting session");
        return Ok(AuthnResponse::Unauthenticated);
    }

    Ok(AuthnResponse::Ok(AuthnUserInfo {
        email: record.email,
        name: record.name,
        role,
    }))
}
