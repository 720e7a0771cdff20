use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Canonical form used for every role comparison.
pub fn normalize_role(role: &str) -> String {
    role.trim().to_lowercase()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhoamiResponse {
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaniResponse {
    pub allow: bool,
}

/// Salted password digest as stored in the user table.
#[derive(Debug, Clone, PartialEq)]
pub struct Credential {
    pub hash: String,
    pub salt: String,
}

impl Credential {
    const SALT_LENGTH: usize = 30;

    pub fn generate(password: &str) -> Self {
        let salt = Self::generate_salt(Self::SALT_LENGTH);
        let hash = Self::get_password_hash(password, &salt);
        Self { hash, salt }
    }

    pub fn verify(&self, password: &str) -> bool {
        Self::get_password_hash(password, &self.salt) == self.hash
    }

    pub fn get_password_hash(password: &str, salt: &str) -> String {
        let combined = format!("{password}{salt}");
        let hash = Sha256::digest(combined.as_bytes());
        format!("{:x}", hash)
    }

    fn generate_salt(length: usize) -> String {
        const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
        let mut rng = rand::thread_rng();

        (0..length)
            .map(|_| {
                let idx = rng.gen_range(0..CHARSET.len());
                CHARSET[idx] as char
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_role() {
        assert_eq!(normalize_role("Chair"), "chair");
        assert_eq!(normalize_role("  Vice Chair "), "vice chair");
        assert_eq!(normalize_role("TREASURER"), "treasurer");
        assert_eq!(normalize_role("   "), "");
    }

    #[test]
    fn test_credential() {
        let cred = Credential::generate("s3cret-pass");
        assert_eq!(cred.salt.len(), 30);
        assert!(cred.verify("s3cret-pass"));
        assert!(!cred.verify("s3cret-Pass"));
        assert!(!cred.verify(""));

        let other = Credential::generate("s3cret-pass");
        assert_ne!(cred.salt, other.salt);
        assert_ne!(cred.hash, other.hash);
    }
}
