use serde::{Deserialize, Serialize};

/// Issued by `POST /login`. The same token is also set as the session cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Email of the user the token was issued to.
    pub user: String,
    pub token: String,

    /// Unix time after which the token is rejected. 0 means it never expires.
    pub expire_in: usize,
}

impl TokenResponse {
    pub fn is_expired(&self, now: usize) -> bool {
        self.expire_in != 0 && now >= self.expire_in
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_expiry() {
        let mut token = TokenResponse {
            user: String::from("chair@org.test"),
            token: String::from("t"),
            expire_in: 100,
        };
        assert!(!token.is_expired(99));
        assert!(token.is_expired(100));

        token.expire_in = 0;
        assert!(!token.is_expired(u32::MAX as usize));
    }
}
