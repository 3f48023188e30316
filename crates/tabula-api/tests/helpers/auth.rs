use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use tabula_api::auth::JwtClaims;
use uuid::Uuid;

/// Secret shared by the test router and the tokens minted here.
pub const TEST_JWT_SECRET: &str = "test-secret-key-min-32-characters-long-for-testing";

/// Caller identity plus a bearer token for it.
pub struct TestUser {
    pub user_id: Uuid,
    pub role: String,
    pub token: String,
}

impl TestUser {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

fn sign(claims: &JwtClaims, secret: &str) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to sign test token")
}

fn claims(role: &str, expires_in: Duration) -> JwtClaims {
    let now = Utc::now();
    JwtClaims {
        sub: Uuid::new_v4(),
        role: role.to_string(),
        exp: (now + expires_in).timestamp(),
        iat: now.timestamp(),
    }
}

/// A fresh user with a one-hour token for `role`.
pub fn test_user(role: &str) -> TestUser {
    let claims = claims(role, Duration::hours(1));
    TestUser {
        user_id: claims.sub,
        role: claims.role.clone(),
        token: sign(&claims, TEST_JWT_SECRET),
    }
}

/// Token that expired an hour ago.
pub fn expired_token(role: &str) -> String {
    sign(&claims(role, Duration::hours(-1)), TEST_JWT_SECRET)
}

/// Token signed with a different secret.
pub fn foreign_token(role: &str) -> String {
    sign(
        &claims(role, Duration::hours(1)),
        "another-secret-key-min-32-characters-long",
    )
}
