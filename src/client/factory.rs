use anyhow::Result;

use crate::config::{CommonConfig, PathSet};

use super::config::ClientConfig;
use super::token::TokenFile;
use super::Client;

pub struct ClientFactory {
    cfg: ClientConfig,
}

impl ClientFactory {
    pub fn load(ps: &PathSet) -> Result<Self> {
        let cfg = ps.load_config("client", ClientConfig::default)?;
        Ok(Self { cfg })
    }

    pub async fn build_client_with_token_file(&self) -> Result<Client> {
        let mut client = self.build_client().await?;
        self.token_file().setup(&mut client).await?;
        Ok(client)
    }

    pub async fn build_client(&self) -> Result<Client> {
        Client::connect(&self.cfg.server, &self.cfg.cert_path).await
    }

    pub fn token_file(&self) -> TokenFile {
        TokenFile::new(
            self.cfg.email.clone(),
            self.cfg.password.clone(),
            self.cfg.token_path.clone(),
        )
    }
}
