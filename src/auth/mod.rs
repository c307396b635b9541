use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Username of the caller
    pub sub: String,
    #[serde(default)]
    pub is_admin: bool,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(username: impl Into<String>, is_admin: bool, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: username.into(),
            is_admin,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("JWT secret not configured")]
    InvalidSecret,
    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),
}

pub fn generate_jwt(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Verifies signature and expiry, returning the decoded claims.
pub fn validate_jwt(token: &str, secret: &str) -> Result<Claims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_token_validates_with_same_secret() {
        let claims = Claims::new("alice", true, 1);
        let token = generate_jwt(&claims, "s3cret").unwrap();

        let decoded = validate_jwt(&token, "s3cret").unwrap();
        assert_eq!(decoded.sub, "alice");
        assert!(decoded.is_admin);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = generate_jwt(&Claims::new("alice", false, 1), "one").unwrap();
        assert!(matches!(validate_jwt(&token, "two"), Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut claims = Claims::new("alice", false, 1);
        claims.iat -= 7200;
        claims.exp = claims.iat + 60;
        let token = generate_jwt(&claims, "s3cret").unwrap();
        assert!(validate_jwt(&token, "s3cret").is_err());
    }

    #[test]
    fn empty_secret_is_a_configuration_error() {
        assert!(matches!(
            generate_jwt(&Claims::new("alice", false, 1), ""),
            Err(JwtError::InvalidSecret)
        ));
        assert!(matches!(validate_jwt("abc", ""), Err(JwtError::InvalidSecret)));
    }
}
