use crate::error::ErrorResponse;
use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use tabula_core::constants::ADMIN_ROLE;
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: Uuid,    // user_id
    pub role: String, // e.g. "admin", "uploader"
    pub exp: i64,     // expiration timestamp
    pub iat: i64,     // issued at timestamp
}

/// Authenticated caller, placed in request extensions by the auth middleware
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }

    /// Whether the caller's role is one of `roles`
    pub fn has_any_role(&self, roles: &[String]) -> bool {
        roles.iter().any(|r| r == &self.role)
    }

    /// Admins see every upload; everyone else only their own.
    pub fn can_access(&self, owner_id: Uuid) -> bool {
        self.is_admin() || self.user_id == owner_id
    }
}

impl From<JwtClaims> for AuthUser {
    fn from(claims: JwtClaims) -> Self {
        Self {
            user_id: claims.sub,
            role: claims.role,
        }
    }
}

// Read directly from request parts so it can be combined with Multipart
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<AuthUser>().cloned().ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: "Missing authentication context".to_string(),
                    details: None,
                    error_type: None,
                    code: "UNAUTHORIZED".to_string(),
                    recoverable: false,
                    suggested_action: Some("Check authentication token".to_string()),
                }),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: &str) -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            role: role.to_string(),
        }
    }

    #[test]
    fn test_role_membership() {
        let roles = vec!["admin".to_string(), "uploader".to_string()];
        assert!(user("uploader").has_any_role(&roles));
        assert!(!user("viewer").has_any_role(&roles));
        assert!(!user("Uploader").has_any_role(&roles));
    }

    #[test]
    fn test_access_owner_or_admin() {
        let owner = user("uploader");
        assert!(owner.can_access(owner.user_id));
        assert!(!owner.can_access(Uuid::new_v4()));
        assert!(user("admin").can_access(Uuid::new_v4()));
    }

    #[test]
    fn test_claims_into_user() {
        let sub = Uuid::new_v4();
        let claims = JwtClaims {
            sub,
            role: "viewer".to_string(),
            exp: 0,
            iat: 0,
        };
        let user = AuthUser::from(claims);
        assert_eq!(user.user_id, sub);
        assert_eq!(user.role, "viewer");
    }
}
