use actix_web::HttpRequest;
use anyhow::Result;

use super::token::TokenValidator;
use super::union::UnionAuthenticator;
use super::{Authenticator, AuthnResponse};

/// Tries each authenticator in order. The first one that finds a credential decides.
pub struct ChainAuthenticator<T: TokenValidator> {
    authenticators: Vec<UnionAuthenticator<T>>,
}

impl<T: TokenValidator> ChainAuthenticator<T> {
    pub fn new(authenticators: Vec<UnionAuthenticator<T>>) -> Self {
        Self { authenticators }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.authenticators.len()
    }
}

impl<T: TokenValidator + Sync + Send> Authenticator for ChainAuthenticator<T> {
    fn authenticate_request(&self, req: &HttpRequest) -> Result<AuthnResponse> {
        for authenticator in self.authenticators.iter() {
            match authenticator.authenticate_request(req)? {
                AuthnResponse::Continue => continue,
                resp => return Ok(resp),
            }
        }
        Ok(AuthnResponse::Continue)
    }
}
