use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::config::{CommonConfig, PathSet};

use super::token::config::TokenConfig;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuthnConfig {
    /// Account seeded with the `admin` role on first start.
    #[serde(default = "AuthnConfig::default_admin_email")]
    pub admin_email: String,

    #[serde(default = "AuthnConfig::default_admin_name")]
    pub admin_name: String,

    /// Only used when the admin account does not exist yet.
    #[serde(default = "AuthnConfig::default_admin_password")]
    pub admin_password: String,

    #[serde(default = "AuthnConfig::default_cookie_name")]
    pub cookie_name: String,

    /// Set the `Secure` flag on the session cookie. Enable behind https.
    #[serde(default = "AuthnConfig::default_cookie_secure")]
    pub cookie_secure: bool,

    #[serde(default = "TokenConfig::default")]
    pub token: TokenConfig,
}

impl CommonConfig for AuthnConfig {
    fn default() -> Self {
        Self {
            admin_email: Self::default_admin_email(),
            admin_name: Self::default_admin_name(),
            admin_password: Self::default_admin_password(),
            cookie_name: Self::default_cookie_name(),
            cookie_secure: Self::default_cookie_secure(),
            token: TokenConfig::default(),
        }
    }

    fn complete(&mut self, ps: &PathSet) -> Result<()> {
        self.admin_email = self.admin_email.trim().to_lowercase();
        if self.admin_email.is_empty() {
            bail!("admin_email should not be empty");
        }
        self.admin_name = self.admin_name.trim().to_string();
        if self.admin_name.is_empty() {
            self.admin_name = Self::default_admin_name();
        }
        if self.admin_password.is_empty() {
            bail!("admin_password should not be empty");
        }

        self.cookie_name = self.cookie_name.trim().to_string();
        if self.cookie_name.is_empty() {
            bail!("cookie_name should not be empty");
        }
        if !self
            .cookie_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            bail!("invalid cookie_name '{}'", self.cookie_name);
        }

        self.token.complete(ps)?;
        Ok(())
    }
}

impl AuthnConfig {
    pub fn default_admin_email() -> String {
        String::from("admin@localhost")
    }

    pub fn default_admin_name() -> String {
        String::from("Administrator")
    }

    pub fn default_admin_password() -> String {
        String::from("admin")
    }

    pub fn default_cookie_name() -> String {
        String::from("orgdash_session")
    }

    pub fn default_cookie_secure() -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authn_config() {
        let ps = PathSet::new_test();

        let mut cfg = AuthnConfig::default();
        cfg.admin_email = String::from("  Root@Org.Test ");
        cfg.admin_name = String::new();
        cfg.complete(&ps).unwrap();
        assert_eq!(cfg.admin_email, "root@org.test");
        assert_eq!(cfg.admin_name, "Administrator");
        assert_eq!(cfg.cookie_name, "orgdash_session");

        let mut cfg = AuthnConfig::default();
        cfg.cookie_name = String::from("bad name;");
        assert!(cfg.complete(&ps).is_err());

        let mut cfg = AuthnConfig::default();
        cfg.admin_password = String::new();
        assert!(cfg.complete(&ps).is_err());
    }
}
