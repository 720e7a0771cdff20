use std::sync::Arc;

use actix_web::HttpRequest;
use anyhow::Result;
use log::debug;

use crate::server::db::Database;

use super::token::TokenValidator;
use super::{resolve_user, Authenticator, AuthnResponse};

/// Reads the session token from `Authorization: Bearer <token>`, as sent by the CLI.
pub struct BearerTokenAuthenticator<T: TokenValidator> {
    validator: Arc<T>,
    db: Arc<Database>,
}

impl<T: TokenValidator> BearerTokenAuthenticator<T> {
    pub fn new(validator: Arc<T>, db: Arc<Database>) -> Self {
        Self { validator, db }
    }
}

impl<T: TokenValidator + Sync + Send> Authenticator for BearerTokenAuthenticator<T> {
    fn authenticate_request(&self, req: &HttpRequest) -> Result<AuthnResponse> {
        let auth = match req.headers().get("Authorization") {
            Some(auth) => match auth.to_str() {
                Ok(auth) => auth.trim().to_string(),
                Err(_) => return Ok(AuthnResponse::Unauthenticated),
            },
            None => return Ok(AuthnResponse::Continue),
        };

        if auth.is_empty() {
            return Ok(AuthnResponse::Continue);
        }

        let mut iter = auth.split_whitespace();
        match iter.next() {
            Some(scheme) if scheme.eq_ignore_ascii_case("bearer") => {}
            _ => return Ok(AuthnResponse::Unauthenticated),
        }

        let token = match iter.next() {
            Some(token) if !token.is_empty() => token,
            _ => return Ok(AuthnResponse::Unauthenticated),
        };

        let email = match self.validator.validate_token(token) {
            Ok(email) => email,
            Err(e) => {
                debug!("Reject bearer token: {e:#}");
                return Ok(AuthnResponse::Unauthenticated);
            }
        };

        resolve_user(&self.db, &email)
    }
}
