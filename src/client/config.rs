use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::config::{expandenv, CommonConfig, PathSet};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ClientConfig {
    #[serde(default = "ClientConfig::default_server")]
    pub server: String,

    #[serde(default = "ClientConfig::default_email")]
    pub email: String,

    #[serde(default = "ClientConfig::default_password")]
    pub password: String,

    /// Where the session token is cached between runs.
    /// Default: {data_path}/token
    #[serde(default = "ClientConfig::default_token_path")]
    pub token_path: String,

    #[serde(default = "ClientConfig::default_cert_path")]
    pub cert_path: String,
}

impl CommonConfig for ClientConfig {
    fn default() -> Self {
        Self {
            server: Self::default_server(),
            email: Self::default_email(),
            password: Self::default_password(),
            token_path: Self::default_token_path(),
            cert_path: Self::default_cert_path(),
        }
    }

    fn complete(&mut self, ps: &PathSet) -> Result<()> {
        // The url itself is validated by Client::connect.
        self.server = expandenv("server", &self.server)?;
        if self.server.is_empty() {
            bail!("server cannot be empty");
        }

        if self.server.starts_with("https") {
            self.cert_path = expandenv("cert_path", &self.cert_path)?;
            if self.cert_path.is_empty() {
                let path = ps.pki_path.join("cert.pem");
                self.cert_path = format!("{}", path.display());
            }
        }

        self.email = expandenv("email", &self.email)?.trim().to_lowercase();
        if self.email.is_empty() {
            bail!("email cannot be empty");
        }

        self.password = expandenv("password", &self.password)?;
        if self.password.is_empty() {
            bail!("password cannot be empty");
        }

        self.token_path = expandenv("token_path", &self.token_path)?;
        if self.token_path.is_empty() {
            let path = ps.data_path.join("token");
            self.token_path = format!("{}", path.display());
        }

        Ok(())
    }
}

impl ClientConfig {
    pub fn default_server() -> String {
        String::from("http://127.0.0.1:7881")
    }

    pub fn default_email() -> String {
        String::from("admin@localhost")
    }

    pub fn default_password() -> String {
        String::from("admin")
    }

    pub fn default_token_path() -> String {
        String::new()
    }

    pub fn default_cert_path() -> String {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config() {
        let ps = PathSet::new_test();

        let mut cfg = ClientConfig::default();
        cfg.complete(&ps).unwrap();
        assert!(cfg.token_path.ends_with("token"));
        assert!(cfg.cert_path.is_empty());

        let mut cfg = ClientConfig::default();
        cfg.server = String::from("https://org.test:7881");
        cfg.email = String::from(" Chair@Org.Test ");
        cfg.complete(&ps).unwrap();
        assert!(cfg.cert_path.ends_with("cert.pem"));
        assert_eq!(cfg.email, "chair@org.test");

        let mut cfg = ClientConfig::default();
        cfg.password = String::new();
        assert!(cfg.complete(&ps).is_err());
    }
}
