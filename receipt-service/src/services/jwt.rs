use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;

/// JWT service for access-token generation and validation.
///
/// Receiptr both issues and validates its own tokens, so HS256 with a
/// configured secret is used; there is no cross-service key distribution.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expiry_minutes: i64,
}

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Email
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// JWT ID
    pub jti: String,
}

impl AccessTokenClaims {
    /// Parse the subject back into the owning user's id.
    pub fn user_id(&self) -> Result<Uuid, anyhow::Error> {
        Uuid::parse_str(&self.sub).map_err(|e| anyhow::anyhow!("Invalid token subject: {}", e))
    }
}

/// Token response returned to the client after login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            access_token_expiry_minutes: config.access_token_expiry_minutes,
        }
    }

    /// Generate an access token for a user.
    pub fn generate_access_token(
        &self,
        user_id: Uuid,
        email: &str,
    ) -> Result<String, anyhow::Error> {
        let now = Utc::now();
        let exp = now + Duration::minutes(self.access_token_expiry_minutes);

        let claims = AccessTokenClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to encode access token: {}", e))?;

        Ok(token)
    }

    /// Validate and decode an access token.
    pub fn validate_access_token(&self, token: &str) -> Result<AccessTokenClaims, anyhow::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        let token_data = decode::<AccessTokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| anyhow::anyhow!("Invalid access token: {}", e))?;

        Ok(token_data.claims)
    }

    /// Wrap a freshly issued token in the client-facing response shape.
    pub fn token_response(&self, access_token: String) -> TokenResponse {
        TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry_minutes * 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_with_expiry(minutes: i64) -> JwtService {
        JwtService::new(&JwtConfig {
            secret: "test-secret".to_string(),
            access_token_expiry_minutes: minutes,
        })
    }

    #[test]
    fn token_roundtrip_preserves_claims() {
        let service = service_with_expiry(15);
        let user_id = Uuid::new_v4();

        let token = service
            .generate_access_token(user_id, "ada@example.com")
            .expect("token generation");
        let claims = service
            .validate_access_token(&token)
            .expect("token validation");

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.user_id().expect("subject parses"), user_id);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let service = service_with_expiry(15);
        let token = service
            .generate_access_token(Uuid::new_v4(), "ada@example.com")
            .expect("token generation");

        let mut tampered = token.clone();
        tampered.pop();
        tampered.push(if token.ends_with('A') { 'B' } else { 'A' });

        assert!(service.validate_access_token(&tampered).is_err());
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let service = service_with_expiry(15);
        let other = JwtService::new(&JwtConfig {
            secret: "different-secret".to_string(),
            access_token_expiry_minutes: 15,
        });

        let token = other
            .generate_access_token(Uuid::new_v4(), "ada@example.com")
            .expect("token generation");

        assert!(service.validate_access_token(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        // Issue a token that expired ten minutes ago, well past the
        // validator's default leeway.
        let service = service_with_expiry(-10);
        let token = service
            .generate_access_token(Uuid::new_v4(), "ada@example.com")
            .expect("token generation");

        assert!(service.validate_access_token(&token).is_err());
    }

    #[test]
    fn token_response_reports_expiry_in_seconds() {
        let service = service_with_expiry(15);
        let response = service.token_response("abc".to_string());
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 900);
    }
}
