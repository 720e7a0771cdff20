use std::sync::Arc;

use anyhow::Result;

use crate::server::db::Database;

use super::bearer_token::BearerTokenAuthenticator;
use super::chain::ChainAuthenticator;
use super::config::AuthnConfig;
use super::cookie::CookieAuthenticator;
use super::token::factory::TokenFactory;
use super::token::jwt::JwtTokenValidator;
use super::union::UnionAuthenticator;

/// Builds the authentication chain: bearer token first, then the session cookie.
pub struct AuthnFactory;

impl AuthnFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn build_authenticator(
        &self,
        cfg: &AuthnConfig,
        token_factory: &TokenFactory,
        db: Arc<Database>,
    ) -> Result<ChainAuthenticator<JwtTokenValidator>> {
        let validator = Arc::new(token_factory.build_token_validator()?);

        let authenticators = vec![
            UnionAuthenticator::BearerToken(BearerTokenAuthenticator::new(
                validator.clone(),
                db.clone(),
            )),
            UnionAuthenticator::Cookie(CookieAuthenticator::new(
                cfg.cookie_name.clone(),
                validator,
                db,
            )),
        ];

        Ok(ChainAuthenticator::new(authenticators))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use crate::config::CommonConfig;
    use crate::server::authn::tests::mock_user;
    use crate::server::authn::token::TokenGenerator;
    use crate::server::authn::{Authenticator, AuthnResponse};

    use super::*;

    #[test]
    fn test_factory() {
        let db = Arc::new(Database::new_test());
        mock_user(&db, "sec@org.test", "Sam", "Secretary", "pw");

        let token_factory = TokenFactory::new_test();
        let cfg = AuthnConfig::default();
        let chain = AuthnFactory::new()
            .build_authenticator(&cfg, &token_factory, db)
            .unwrap();
        assert_eq!(chain.len(), 2);

        let token = token_factory
            .build_token_generator()
            .unwrap()
            .generate_token(String::from("sec@org.test"))
            .unwrap();
        let req = TestRequest::default()
            .insert_header(("Authorization", format!("Bearer {}", token.token)))
            .to_http_request();
        match chain.authenticate_request(&req).unwrap() {
            AuthnResponse::Ok(user) => assert_eq!(user.role, "secretary"),
            resp => panic!("unexpected response {resp:?}"),
        }
    }
}
