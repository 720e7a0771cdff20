use actix_web::HttpRequest;
use anyhow::Result;

use super::bearer_token::BearerTokenAuthenticator;
use super::cookie::CookieAuthenticator;
use super::token::TokenValidator;
use super::{Authenticator, AuthnResponse};

pub enum UnionAuthenticator<T: TokenValidator> {
    BearerToken(BearerTokenAuthenticator<T>),
    Cookie(CookieAuthenticator<T>),
}

impl<T: TokenValidator + Sync + Send> Authenticator for UnionAuthenticator<T> {
    fn authenticate_request(&self, req: &HttpRequest) -> Result<AuthnResponse> {
        match self {
            UnionAuthenticator::BearerToken(auth) => auth.authenticate_request(req),
            UnionAuthenticator::Cookie(auth) => auth.authenticate_request(req),
        }
    }
}
