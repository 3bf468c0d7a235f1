//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::crypto::random_bytes;
use platform::jwt::{DEFAULT_TOKEN_TTL, TokenCodec};

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Signs and verifies bearer tokens
    pub tokens: TokenCodec,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::with_random_secret()
    }
}

impl AuthConfig {
    pub fn new(jwt_secret: &[u8], token_ttl: Duration) -> Self {
        Self {
            tokens: TokenCodec::new(jwt_secret, token_ttl),
            password_pepper: None,
        }
    }

    /// Create config with a random JWT secret (tokens die with the process)
    pub fn with_random_secret() -> Self {
        Self::new(&random_bytes(32), DEFAULT_TOKEN_TTL)
    }

    /// Create config for development
    pub fn development() -> Self {
        Self::with_random_secret()
    }

    pub fn with_pepper(mut self, pepper: impl Into<Vec<u8>>) -> Self {
        self.password_pepper = Some(pepper.into());
        self
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}
