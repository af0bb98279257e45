use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: i64, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: user_id.to_string(),
            exp,
            iat: now.timestamp(),
        }
    }

    pub fn user_id(&self) -> Result<i64, AuthError> {
        self.sub.parse().map_err(|_| AuthError::InvalidToken("subject is not a user id".to_string()))
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Session token generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid session token: {0}")]
    InvalidToken(String),

    #[error("Invalid secret key")]
    InvalidSecret,

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

/// Signed session token for a saved user
pub fn issue_session_token(security: &SecurityConfig, user_id: i64) -> Result<String, AuthError> {
    if security.secret_key.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let claims = Claims::new(user_id, security.session_expiry_hours);
    let encoding_key = EncodingKey::from_secret(security.secret_key.as_bytes());

    encode(&Header::default(), &claims, &encoding_key).map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

/// Verifies signature and expiry, returning the claims
pub fn validate_session_token(security: &SecurityConfig, token: &str) -> Result<Claims, AuthError> {
    if security.secret_key.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(security.secret_key.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

/// Argon2id hash in PHC string format
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// False for a wrong password and for an unparseable hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok(),
        Err(e) => {
            tracing::warn!("Stored password hash could not be parsed: {}", e);
            false
        }
    }
}
