//! Bearer-token authentication.
//!
//! Tokens are HS256 JWTs signed with `JWT_SECRET_KEY`. Handlers that need a
//! caller take an [`AuthUser`] argument; the extractor rejects the request
//! before the handler runs when the token is missing or invalid.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Participant,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub club_name: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

impl Claims {
    pub fn new(
        id: Uuid,
        username: impl Into<String>,
        email: impl Into<String>,
        role: Role,
        club_name: Option<String>,
        lifetime: Duration,
    ) -> Self {
        let now = u64::try_from(Utc::now().timestamp()).unwrap_or_default();
        Self {
            id,
            username: username.into(),
            email: email.into(),
            role,
            club_name,
            exp: now + lifetime.as_secs(),
        }
    }
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

impl JwtService {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding_key: Arc::new(EncodingKey::from_secret(secret)),
            decoding_key: Arc::new(DecodingKey::from_secret(secret)),
        }
    }

    pub fn issue(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Token signing failed: {e}")))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected bearer token");
                AppError::Forbidden("Invalid token.".to_string())
            })
    }
}

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

impl AuthUser {
    pub fn require_admin(&self) -> Result<(), AppError> {
        match self.role {
            Role::Admin => Ok(()),
            Role::Participant => Err(AppError::Forbidden(
                "Only club admins can perform this action".to_string(),
            )),
        }
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.id,
            username: claims.username,
            role: claims.role,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    JwtService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::AuthError("Access denied. No token provided.".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Forbidden("Invalid token.".to_string()))?;

        let jwt = JwtService::from_ref(state);
        jwt.verify(token.trim()).map(AuthUser::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Role, lifetime: Duration) -> Claims {
        Claims::new(
            Uuid::new_v4(),
            "asha",
            "asha@campus.edu",
            role,
            None,
            lifetime,
        )
    }

    #[test]
    fn test_issue_then_verify() {
        let jwt = JwtService::from_secret(b"unit-test-secret");
        let original = claims(Role::Admin, Duration::from_secs(3600));
        let token = jwt.issue(&original).unwrap();

        let verified = jwt.verify(&token).unwrap();
        assert_eq!(verified.id, original.id);
        assert_eq!(verified.role, Role::Admin);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = JwtService::from_secret(b"one")
            .issue(&claims(Role::Participant, Duration::from_secs(3600)))
            .unwrap();

        let err = JwtService::from_secret(b"two").verify(&token).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let jwt = JwtService::from_secret(b"unit-test-secret");
        let mut expired = claims(Role::Participant, Duration::ZERO);
        expired.exp -= 3600;
        let token = jwt.issue(&expired).unwrap();

        assert!(jwt.verify(&token).is_err());
    }

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let role: Role = serde_json::from_str("\"participant\"").unwrap();
        assert_eq!(role, Role::Participant);
    }

    #[test]
    fn test_require_admin() {
        let admin = AuthUser::from(claims(Role::Admin, Duration::from_secs(60)));
        let participant = AuthUser::from(claims(Role::Participant, Duration::from_secs(60)));

        assert!(admin.require_admin().is_ok());
        assert!(matches!(
            participant.require_admin(),
            Err(AppError::Forbidden(_))
        ));
    }
}
