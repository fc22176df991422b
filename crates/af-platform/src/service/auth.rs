//! Authentication Service
//!
//! Stateless HS256 session tokens. The token carries the profile id, email,
//! and role; handlers rebuild an [`AuthContext`] from the validated claims.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::{Profile, UserRole};
use crate::error::{PortalError, Result};

/// Auth configuration, read from the environment by the server binary.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub token_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "development-secret-change-me".to_string(),
            jwt_issuer: "admitflow".to_string(),
            token_ttl_hours: 24,
        }
    }
}

/// JWT claims for a portal session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Profile id.
    pub sub: String,
    pub iss: String,
    pub email: String,
    pub role: UserRole,
    /// Expiry (Unix seconds).
    pub exp: i64,
    /// Issued at (Unix seconds).
    pub iat: i64,
}

/// The authenticated caller, rebuilt from validated claims. The request
/// extractor fills in the client metadata so audit entries can carry it.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub profile_id: String,
    pub email: String,
    pub role: UserRole,
    pub ip_address: Option<String>,
    pub request_id: Option<String>,
}

impl AuthContext {
    pub fn is_staff(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl From<SessionClaims> for AuthContext {
    fn from(claims: SessionClaims) -> Self {
        Self {
            profile_id: claims.sub,
            email: claims.email,
            role: claims.role,
            ip_address: None,
            request_id: None,
        }
    }
}

#[derive(Clone)]
pub struct AuthService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.jwt_issuer.clone(),
            token_ttl: Duration::hours(config.token_ttl_hours),
        }
    }

    pub fn issue_token(&self, profile: &Profile) -> Result<String> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: profile.id.clone(),
            iss: self.issuer.clone(),
            email: profile.email.clone(),
            role: profile.role,
            exp: (now + self.token_ttl).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| PortalError::internal(format!("Token signing failed: {e}")))
    }

    pub fn validate_token(&self, token: &str) -> Result<SessionClaims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        decode::<SessionClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => PortalError::TokenExpired,
                _ => PortalError::InvalidToken {
                    message: e.to_string(),
                },
            })
    }
}

/// Pull the token out of an `Authorization: Bearer ...` header value.
pub fn extract_bearer_token(header: &str) -> Result<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| PortalError::unauthorized("Expected a bearer token"))
}

/// Access-rule helpers shared by handlers and services.
pub mod checks {
    use super::AuthContext;
    use crate::error::{PortalError, Result};

    pub fn require_staff(ctx: &AuthContext) -> Result<()> {
        if ctx.is_staff() {
            Ok(())
        } else {
            Err(PortalError::forbidden("Staff role required"))
        }
    }

    /// Owners can see their own records; staff can see everything.
    pub fn require_self_or_staff(ctx: &AuthContext, owner_id: &str) -> Result<()> {
        if ctx.is_staff() || ctx.profile_id == owner_id {
            Ok(())
        } else {
            Err(PortalError::forbidden("Not your record"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new(&AuthConfig {
            jwt_secret: "test-secret".to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn token_round_trip() {
        let svc = service();
        let profile = Profile::new("Asha Rao", "asha@example.com", UserRole::Student);
        let token = svc.issue_token(&profile).unwrap();

        let claims = svc.validate_token(&token).unwrap();
        assert_eq!(claims.sub, profile.id);
        assert_eq!(claims.email, "asha@example.com");
        assert_eq!(claims.role, UserRole::Student);
    }

    #[test]
    fn wrong_secret_rejected() {
        let svc = service();
        let other = AuthService::new(&AuthConfig {
            jwt_secret: "different-secret".to_string(),
            ..Default::default()
        });

        let profile = Profile::new("Asha Rao", "asha@example.com", UserRole::Student);
        let token = svc.issue_token(&profile).unwrap();
        assert!(matches!(
            other.validate_token(&token),
            Err(PortalError::InvalidToken { .. })
        ));
    }

    #[test]
    fn bearer_extraction() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert!(extract_bearer_token("Basic abc").is_err());
        assert!(extract_bearer_token("Bearer ").is_err());
    }

    #[test]
    fn access_checks() {
        let student = AuthContext {
            profile_id: "s1".to_string(),
            email: "s@example.com".to_string(),
            role: UserRole::Student,
            ip_address: None,
            request_id: None,
        };
        let admin = AuthContext {
            profile_id: "a1".to_string(),
            email: "a@example.com".to_string(),
            role: UserRole::Admin,
            ip_address: None,
            request_id: None,
        };

        assert!(checks::require_staff(&student).is_err());
        assert!(checks::require_staff(&admin).is_ok());
        assert!(checks::require_self_or_staff(&student, "s1").is_ok());
        assert!(checks::require_self_or_staff(&student, "s2").is_err());
        assert!(checks::require_self_or_staff(&admin, "s2").is_ok());
    }
}
