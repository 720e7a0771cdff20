use anyhow::{bail, Result};

use super::{TokenGenerator, TokenResponse, TokenValidator};

/// Unsigned token for tests: `simple-token-<email>`.
#[derive(Debug, Clone)]
pub struct SimpleToken;

impl SimpleToken {
    pub fn new() -> Self {
        Self
    }
}

impl TokenGenerator for SimpleToken {
    fn generate_token(&self, email: String) -> Result<TokenResponse> {
        Ok(TokenResponse {
            token: format!("simple-token-{email}"),
            user: email,
            expire_in: 0,
        })
    }
}

impl TokenValidator for SimpleToken {
    fn validate_token(&self, token: &str) -> Result<String> {
        match token.strip_prefix("simple-token-") {
            Some(email) if !email.is_empty() => Ok(email.to_string()),
            _ => bail!("invalid simple token"),
        }
    }
}
