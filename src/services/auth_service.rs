//! Authentication service - Verifies bearer tokens.
//!
//! Tokens are issued by the identity service; this crate only verifies
//! them and extracts the authenticated user id. There is no register or
//! login flow here.

use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::errors::AppResult;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: i64,
    pub iat: i64,
}

/// Authentication service trait for dependency injection.
pub trait AuthService: Send + Sync {
    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Concrete implementation of AuthService backed by the shared secret.
pub struct Authenticator {
    config: Config,
}

impl Authenticator {
    /// Create new auth service instance
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl AuthService for Authenticator {
    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}
