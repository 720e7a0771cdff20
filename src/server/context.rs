use std::sync::Arc;

use super::authn::Authenticator;
use super::authn::token::TokenGenerator;
use super::authz::chain::ChainAuthorizer;
use super::db::Database;

/// Session cookie attributes, from `[authn]`.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub name: String,
    pub secure: bool,
}

/// Shared state of every request handler.
pub struct ServerContext {
    pub db: Arc<Database>,

    pub authn: Box<dyn Authenticator>,
    pub authz: ChainAuthorizer,

    pub token_generator: Box<dyn TokenGenerator>,
    pub cookie: CookieSettings,
}

#[cfg(test)]
impl ServerContext {
    pub fn new_test() -> Self {
        use crate::config::CommonConfig;
        use crate::server::authz::config::AuthzConfig;

        Self::new_test_with(&AuthzConfig::default())
    }

    pub fn new_test_with(authz_cfg: &crate::server::authz::config::AuthzConfig) -> Self {
        use crate::server::authn::tests::mock_chain;
        use crate::server::authn::token::simple::SimpleToken;
        use crate::server::authz::factory::AuthzFactory;

        let db = Arc::new(Database::new_test());
        let authn = mock_chain(db.clone());
        let authz = AuthzFactory::new()
            .build_authorizer(authz_cfg, db.clone())
            .unwrap();
        Self {
            db,
            authn: Box::new(authn),
            authz,
            token_generator: Box::new(SimpleToken::new()),
            cookie: CookieSettings {
                name: String::from("orgdash_session"),
                secure: false,
            },
        }
    }
}
