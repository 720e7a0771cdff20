use std::sync::Arc;

use anyhow::{Context, Result};
use log::{info, warn};
use openssl::ssl::{SslAcceptor, SslAcceptorBuilder, SslFiletype, SslMethod};

use crate::server::authn::factory::AuthnFactory;
use crate::server::authn::token::factory::TokenFactory;
use crate::server::authz::factory::AuthzFactory;
use crate::server::db::factory::DbFactory;
use crate::server::db::UserRecord;
use crate::time::current_timestamp;
use crate::types::user::Credential;

use super::config::ServerConfig;
use super::context::{CookieSettings, ServerContext};
use super::db::Database;
use super::restful::RestfulServer;

pub const ADMIN_ROLE: &str = "admin";

pub struct ServerFactory {
    db: Arc<Database>,
    cfg: ServerConfig,
}

impl ServerFactory {
    pub fn new(cfg: ServerConfig) -> Result<Self> {
        let db_factory = DbFactory::new();
        let db = db_factory.build_db(&cfg.db).context("init database")?;
        Ok(Self { cfg, db })
    }

    pub fn build_server(&self) -> Result<RestfulServer> {
        let ssl = self.build_ssl()?;
        let ctx = self.build_context()?;

        let mut srv =
            RestfulServer::new(self.cfg.bind.clone(), ssl, ctx, self.cfg.payload_limit_mib);
        if self.cfg.keep_alive_secs > 0 {
            srv.set_keep_alive_secs(self.cfg.keep_alive_secs);
        }
        if self.cfg.workers > 0 {
            srv.set_workers(self.cfg.workers);
        }

        Ok(srv)
    }

    pub fn build_ssl(&self) -> Result<Option<SslAcceptorBuilder>> {
        if !self.cfg.ssl {
            return Ok(None);
        }

        let mut builder =
            SslAcceptor::mozilla_intermediate(SslMethod::tls()).context("init ssl acceptor")?;

        builder
            .set_private_key_file(&self.cfg.key_path, SslFiletype::PEM)
            .context("load ssl key file")?;
        builder
            .set_certificate_chain_file(&self.cfg.cert_path)
            .context("load ssl cert file")?;

        Ok(Some(builder))
    }

    pub fn build_context(&self) -> Result<Arc<ServerContext>> {
        self.ensure_admin().context("bootstrap admin account")?;

        let token_factory = TokenFactory::new(&self.cfg.authn.token).context("init token")?;

        let authn = AuthnFactory::new()
            .build_authenticator(&self.cfg.authn, &token_factory, self.db.clone())
            .context("init authenticator")?;

        let authz = AuthzFactory::new()
            .build_authorizer(&self.cfg.authz, self.db.clone())
            .context("init authorizer")?;

        let token_generator = token_factory
            .build_token_generator()
            .context("init token generator")?;

        if !self.cfg.authn.cookie_secure && self.cfg.ssl {
            warn!("Serving https but the session cookie is not marked secure");
        }

        let ctx = ServerContext {
            db: self.db.clone(),
            authn: Box::new(authn),
            authz,
            token_generator: Box::new(token_generator),
            cookie: CookieSettings {
                name: self.cfg.authn.cookie_name.clone(),
                secure: self.cfg.authn.cookie_secure,
            },
        };
        Ok(Arc::new(ctx))
    }

    /// Creates the configured admin login when it does not exist yet. An existing
    /// account is left untouched, so a changed password in the config has no effect.
    fn ensure_admin(&self) -> Result<()> {
        let cfg = &self.cfg.authn;
        if cfg.admin_password == "admin" {
            warn!("Using default admin password IS DANGEROUS, please change it in production");
        }

        let created = self.db.with_transaction(|tx| {
            if tx.is_user_exists(&cfg.admin_email)? {
                return Ok(false);
            }
            let cred = Credential::generate(&cfg.admin_password);
            tx.create_user(&UserRecord {
                email: cfg.admin_email.clone(),
                name: cfg.admin_name.clone(),
                role: String::from(ADMIN_ROLE),
                hash: cred.hash,
                salt: cred.salt,
                last_seen: 0,
                create_time: current_timestamp(),
            })?;
            Ok(true)
        })?;

        if created {
            info!("Created admin account '{}'", cfg.admin_email);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::CommonConfig;

    use super::*;

    #[test]
    fn test_ensure_admin() {
        let mut cfg = ServerConfig::default();
        cfg.db.sqlite.memory = true;
        cfg.authn.admin_email = String::from("root@org.test");
        cfg.authn.admin_password = String::from("hunter22");

        let factory = ServerFactory::new(cfg).unwrap();
        factory.ensure_admin().unwrap();
        // Second start keeps the existing account
        factory.ensure_admin().unwrap();

        let user = factory
            .db
            .with_transaction(|tx| tx.get_user("root@org.test"))
            .unwrap()
            .unwrap();
        assert_eq!(user.role, ADMIN_ROLE);
        let cred = Credential {
            hash: user.hash,
            salt: user.salt,
        };
        assert!(cred.verify("hunter22"));
    }
}
