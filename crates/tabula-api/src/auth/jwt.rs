//! HS256 bearer token verification
//!
//! Tokens are issued by an external identity service sharing `JWT_SECRET`;
//! this service only verifies them.

use super::models::JwtClaims;
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use tabula_core::AppError;

/// Verifies HS256 tokens signed with the shared secret
#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Decode and validate a token, returning its claims
    pub fn verify(&self, token: &str) -> Result<JwtClaims, AppError> {
        let token_data = decode::<JwtClaims>(token, &self.key, &self.validation).map_err(|e| {
            tracing::debug!("JWT validation failed: {}", e);
            match e.kind() {
                ErrorKind::ExpiredSignature => {
                    AppError::Unauthorized("Token has expired".to_string())
                }
                ErrorKind::InvalidSignature => {
                    AppError::Unauthorized("Invalid token signature".to_string())
                }
                _ => AppError::Unauthorized("Invalid or expired token".to_string()),
            }
        })?;

        Ok(token_data.claims)
    }
}
