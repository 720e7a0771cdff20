use std::sync::Arc;

use actix_web::HttpRequest;
use anyhow::Result;
use log::debug;

use crate::server::db::Database;

use super::token::TokenValidator;
use super::{resolve_user, Authenticator, AuthnResponse};

/// Reads the session token from the cookie set by `/login`, as sent by browsers.
pub struct CookieAuthenticator<T: TokenValidator> {
    name: String,
    validator: Arc<T>,
    db: Arc<Database>,
}

impl<T: TokenValidator> CookieAuthenticator<T> {
    pub fn new(name: String, validator: Arc<T>, db: Arc<Database>) -> Self {
        Self {
            name,
            validator,
            db,
        }
    }
}

impl<T: TokenValidator + Sync + Send> Authenticator for CookieAuthenticator<T> {
    fn authenticate_request(&self, req: &HttpRequest) -> Result<AuthnResponse> {
        let cookie = match req.cookie(&self.name) {
            Some(cookie) => cookie,
            None => return Ok(AuthnResponse::Continue),
        };

        let token = cookie.value().trim();
        if token.is_empty() {
            return Ok(AuthnResponse::Continue);
        }

        let email = match self.validator.validate_token(token) {
            Ok(email) => email,
            Err(e) => {
                debug!("Reject session cookie: {e:#}");
                return Ok(AuthnResponse::Unauthenticated);
            }
        };

        resolve_user(&self.db, &email)
    }
}
