use std::{fs, io};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::time::current_timestamp;
use crate::types::token::TokenResponse;

use super::Client;

/// Session token cached on disk so that each command does not log in again.
pub struct TokenFile {
    email: String,
    password: String,
    path: String,
}

impl TokenFile {
    pub fn new(email: String, password: String, path: String) -> Self {
        Self {
            email,
            password,
            path,
        }
    }

    pub async fn setup(&self, client: &mut Client) -> Result<()> {
        let token = match self.read()? {
            Some(token) => token,
            None => {
                info!("Logging in to server as '{}'", self.email);
                let mut token_resp = client.login(&self.email, &self.password).await?;
                token_resp.expire_in = token_resp
                    .expire_in
                    .saturating_sub(Client::MAX_TIME_DELTA_WITH_SERVER);
                self.write(&token_resp)?;
                token_resp.token
            }
        };

        client.set_token(token);
        Ok(())
    }

    /// Drops the cached token, the next `setup` logs in again.
    pub fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).context("remove token file"),
        }
    }

    fn read(&self) -> Result<Option<String>> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err).context("read token file"),
        };

        let resp: TokenResponse = match serde_json::from_slice(&data) {
            Ok(resp) => resp,
            Err(_) => {
                warn!("Token file has invalid token data, ignore it");
                return Ok(None);
            }
        };

        if resp.user != self.email {
            warn!("Token file belongs to another user, ignore it");
            return Ok(None);
        }

        if resp.is_expired(current_timestamp() as usize) {
            info!("Token file has expired, acquiring a new one");
            return Ok(None);
        }

        Ok(Some(resp.token))
    }

    fn write(&self, token: &TokenResponse) -> Result<()> {
        let data = serde_json::to_vec(token)?;
        fs::write(&self.path, data).context("write token file")?;
        Ok(())
    }
}
