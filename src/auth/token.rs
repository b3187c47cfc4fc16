use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::error::{AppError, AuthError};

const GENERATED_SECRET_LEN: usize = 64;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub exp: i64, // Expiration time
}

/// Issues and checks HS256 session tokens.
///
/// Tokens are stateless: a token is valid while its signature verifies and
/// `exp` lies in the future.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn issue(&self, email: &str) -> Result<String, AppError> {
        let claims = Claims {
            email: email.to_string(),
            exp: (Utc::now() + self.ttl).timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        debug!("Issued token for {} expiring at {}", email, claims.exp);
        Ok(token)
    }

    /// Expired tokens fail with `AuthError::TokenExpired`; bad signatures and
    /// garbage fail with `AuthError::TokenInvalid`.
    pub fn validate(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        // jsonwebtoken still accepts `exp == now`; a token is dead at its expiry second.
        if data.claims.exp <= Utc::now().timestamp() {
            return Err(AuthError::TokenExpired.into());
        }
        Ok(data.claims)
    }
}

pub fn generate_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_SECRET_LEN)
        .map(char::from)
        .collect()
}
