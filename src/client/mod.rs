pub mod board;
pub mod config;
pub mod factory;
pub mod token;

use std::{fs, io};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::Local;
use log::{info, warn};
use reqwest::{Certificate, Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::types::healthz::HealthzResponse;
use crate::types::permission::{PermissionRule, UpsertRuleRequest};
use crate::types::response::{CommonResponse, ResourceResponse, MIME_JSON};
use crate::types::token::TokenResponse;
use crate::types::user::{CaniResponse, LoginRequest, WhoamiResponse};

/// The permission table as seen from a client. [`board::PermissionBoard`] is
/// written against this so it can run on top of any transport.
#[async_trait]
pub trait PermissionApi: Send + Sync {
    async fn list_rules(&self) -> Result<Vec<PermissionRule>, RequestError>;

    /// Replaces the whole role set of `action_key` and returns the stored rule.
    async fn upsert_rule(
        &self,
        action_key: &str,
        allowed_roles: Vec<String>,
    ) -> Result<PermissionRule, RequestError>;
}

#[derive(Debug, Clone)]
pub struct Client {
    url: String,
    client: reqwest::Client,
    token: Option<String>,
}

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Network error: {0}")]
    Network(#[from] anyhow::Error),

    #[error("Client error: {0}")]
    Client(String),

    #[error("Server error: code {code}, {message}")]
    Server { code: u16, message: String },

    #[error("Check health error: {0}")]
    Health(String),

    #[error("Unexpected error: {0}")]
    Unexpected(&'static str),

    #[error("Server returned invalid json: {0:?}")]
    InvalidJson(String),
}

impl RequestError {
    pub fn is_forbidden(&self) -> bool {
        matches!(self, RequestError::Server { code: 403, .. })
    }
}

impl Client {
    pub const MAX_TIME_DELTA_WITH_SERVER: usize = 30;

    pub async fn connect(url: &str, cert_path: &str) -> Result<Self> {
        let url = url.trim_end_matches('/');
        let parsed = match Url::parse(url) {
            Ok(url) => url,
            Err(_) => bail!("invalid server url '{url}'"),
        };
        match parsed.scheme() {
            "http" | "https" => {}
            _ => bail!(
                "invalid url scheme, expect 'http' or 'https', not '{}'",
                parsed.scheme()
            ),
        }

        if parsed.path() != "/" {
            bail!(
                "invalid server url, path should be '/', not '{}'",
                parsed.path()
            );
        }

        let client = if cert_path.is_empty() || parsed.scheme() == "http" {
            reqwest::Client::new()
        } else {
            match fs::read(cert_path) {
                Ok(data) => {
                    let cert = Certificate::from_pem(&data).context("load cert file")?;
                    reqwest::Client::builder()
                        .add_root_certificate(cert)
                        .build()
                        .context("build server client")?
                }
                Err(err) if err.kind() == io::ErrorKind::NotFound => reqwest::Client::new(),
                Err(err) => return Err(err).context("read cert file"),
            }
        };

        let client = Client {
            url: url.to_string(),
            client,
            token: None,
        };
        client.check_health().await?;

        Ok(client)
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub async fn healthz(&self) -> Result<HealthzResponse, RequestError> {
        self.do_request_data(Method::GET, "healthz", None).await
    }

    async fn check_health(&self) -> Result<(), RequestError> {
        let resp = self.healthz().await?;

        // Session expiry is compared against local time.
        let now = Local::now().timestamp() as u64;
        let delta = now.abs_diff(resp.now);
        if delta > Self::MAX_TIME_DELTA_WITH_SERVER as u64 {
            return Err(RequestError::Health(format!(
                "system time differs too much from server time: difference: {delta}s, maximum tolerance: {}s",
                Self::MAX_TIME_DELTA_WITH_SERVER
            )));
        }

        if !resp.database {
            warn!("Server at '{}' reports its database as unavailable", self.url);
        }

        let client_ip = resp.client_ip.unwrap_or(String::from("unknown"));
        let version = resp.version.unwrap_or(String::from("unknown"));
        info!(
            "Connected to server '{}' ({version}), with client ip '{client_ip}'",
            self.url
        );

        Ok(())
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, RequestError> {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let body = Self::encode_json(&req)?;
        self.do_request_data(Method::POST, "login", Some(body)).await
    }

    pub async fn whoami(&self) -> Result<WhoamiResponse, RequestError> {
        self.do_request_data(Method::GET, "api/user", None).await
    }

    pub async fn cani(&self, action_key: &str) -> Result<bool, RequestError> {
        let resp: CaniResponse = self
            .do_request_data(Method::GET, &format!("api/cani/{action_key}"), None)
            .await?;
        Ok(resp.allow)
    }

    fn encode_json<T: Serialize>(value: &T) -> Result<String, RequestError> {
        serde_json::to_string(value)
            .map_err(|e| RequestError::Client(format!("encode request body failed: {e}")))
    }

    async fn do_request_data<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<T, RequestError>
    where
        T: Serialize + DeserializeOwned,
    {
        let resp: ResourceResponse<T> = self.do_request_json(method, path, body).await?;
        match resp.data {
            Some(data) => Ok(data),
            None => Err(RequestError::Unexpected(
                "server didn't return data in json",
            )),
        }
    }

    async fn do_request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<T, RequestError> {
        let url = format!("{}/{}", self.url, path);
        let mut req = self
            .client
            .request(method, &url)
            .header("Accept", MIME_JSON);
        if let Some(body) = body {
            req = req.header("Content-Type", MIME_JSON).body(body);
        }
        if let Some(token) = &self.token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }
        let req = match req.build() {
            Ok(req) => req,
            Err(e) => return Err(RequestError::Client(format!("build request failed: {e:#}"))),
        };
        let resp = match self.client.execute(req).await {
            Ok(resp) => resp,
            Err(e) => return Err(RequestError::Network(e.into())),
        };

        let is_json = resp
            .headers()
            .get("Content-Type")
            .and_then(|ct| ct.to_str().ok())
            .map(|ct| ct.contains(MIME_JSON))
            .unwrap_or_default();
        if !is_json {
            return Err(RequestError::Unexpected(
                "server returned non-json content type",
            ));
        }

        let data = resp
            .text()
            .await
            .map_err(|e| RequestError::Network(e.into()))?;

        // Error envelopes carry no data, decode them on their own so that the
        // code and message survive.
        if let Ok(common) = serde_json::from_str::<CommonResponse>(&data) {
            if !common.is_success() {
                return Err(RequestError::Server {
                    code: common.code,
                    message: common.message.unwrap_or_default(),
                });
            }
        }

        match serde_json::from_str(&data) {
            Ok(data) => Ok(data),
            Err(_) => Err(RequestError::InvalidJson(data)),
        }
    }
}

#[async_trait]
impl PermissionApi for Client {
    async fn list_rules(&self) -> Result<Vec<PermissionRule>, RequestError> {
        self.do_request_data(Method::GET, "api/permissions", None)
            .await
    }

    async fn upsert_rule(
        &self,
        action_key: &str,
        allowed_roles: Vec<String>,
    ) -> Result<PermissionRule, RequestError> {
        let req = UpsertRuleRequest {
            action_key: action_key.to_string(),
            allowed_roles,
        };
        let body = Self::encode_json(&req)?;
        self.do_request_data(Method::POST, "api/permissions", Some(body))
            .await
    }
}
