pub mod config;
pub mod factory;
pub mod jwt;

#[cfg(test)]
pub mod simple;

use anyhow::Result;

use crate::types::token::TokenResponse;

pub trait TokenGenerator: Send + Sync {
    /// Issues a session token whose subject is the user's email.
    fn generate_token(&self, email: String) -> Result<TokenResponse>;
}

pub trait TokenValidator {
    /// Returns the token subject.
    fn validate_token(&self, token: &str) -> Result<String>;
}

#[cfg(test)]
pub mod tests {
    use once_cell::sync::Lazy;

    use crate::rsa::generate_rsa_keys;

    use super::jwt::{JwtTokenGenerator, JwtTokenValidator};
    use super::*;

    /// One RSA pair shared by every test in the binary, generation is slow.
    pub static TEST_KEYS: Lazy<(Vec<u8>, Vec<u8>)> =
        Lazy::new(|| generate_rsa_keys().unwrap());

    fn run_token_tests<TG, TV>(generator: &TG, validator: &TV)
    where
        TG: TokenGenerator,
        TV: TokenValidator,
    {
        let users = [
            "chair@org.test",
            "vice@org.test",
            "tres@org.test",
            "member@org.test",
        ];
        for user in users.iter() {
            let token = generator.generate_token(user.to_string()).unwrap();
            assert_eq!(token.user, *user);
            let result = validator.validate_token(&token.token).unwrap();
            assert_eq!(result, user.to_string());
        }

        assert!(validator.validate_token("").is_err());
        assert!(validator.validate_token("not-a-token").is_err());
    }

    #[test]
    fn test_jwt_token() {
        let (public_key, private_key) = &*TEST_KEYS;
        let generator = JwtTokenGenerator::new(private_key, 3600).unwrap();
        let validator = JwtTokenValidator::new(public_key).unwrap();
        run_token_tests(&generator, &validator);

        assert!(generator.generate_token(String::new()).is_err());

        // A token signed by another key pair is rejected
        let (_, other_private) = generate_rsa_keys().unwrap();
        let other = JwtTokenGenerator::new(&other_private, 3600).unwrap();
        let token = other.generate_token(String::from("chair@org.test")).unwrap();
        assert!(validator.validate_token(&token.token).is_err());
    }

    #[test]
    fn test_simple_token() {
        let token = simple::SimpleToken::new();
        run_token_tests(&token, &token);
    }
}
