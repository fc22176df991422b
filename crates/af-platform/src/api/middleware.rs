//! Application State and Authentication Extractor

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};

use crate::error::PortalError;
use crate::repository::{
    DocumentTypeRepository, ProfileRepository, ProgramDocumentRepository, ProgramRepository,
    UniversityRepository,
};
use crate::service::auth::{extract_bearer_token, AuthContext, AuthService};
use crate::service::{ApplicationService, AuditService, DocumentService, TicketService};

/// Everything the handlers need, injected as a request extension.
#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::PgPool,
    pub auth: AuthService,
    pub profiles: ProfileRepository,
    pub universities: UniversityRepository,
    pub programs: ProgramRepository,
    pub document_types: DocumentTypeRepository,
    pub program_documents: ProgramDocumentRepository,
    pub applications: ApplicationService,
    pub documents: DocumentService,
    pub tickets: TicketService,
    pub audit: AuditService,
}

/// Extracts and validates the bearer token, yielding the caller's context.
pub struct Authenticated(pub AuthContext);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = PortalError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let state = parts
            .extensions
            .get::<AppState>()
            .ok_or_else(|| PortalError::internal("AppState extension missing"))?;

        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| PortalError::unauthorized("Missing Authorization header"))?;

        let token = extract_bearer_token(header)?;
        let claims = state.auth.validate_token(token)?;

        let mut ctx: AuthContext = claims.into();
        ctx.ip_address = client_ip(&parts.headers);
        ctx.request_id = request_id(&parts.headers);
        Ok(Authenticated(ctx))
    }
}

/// Client metadata for endpoints that run before authentication, such as
/// login and registration. Extraction never fails; absent headers yield
/// `None`.
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    pub ip_address: Option<String>,
    pub request_id: Option<String>,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for RequestMeta
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequestMeta {
            ip_address: client_ip(&parts.headers),
            request_id: request_id(&parts.headers),
        })
    }
}

/// First entry of `X-Forwarded-For`, as set by the reverse proxy.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
}

fn request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwarded_for_takes_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            "203.0.113.7, 10.0.0.1".parse().unwrap(),
        );
        assert_eq!(client_ip(&headers).as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn missing_client_headers_yield_none() {
        let headers = HeaderMap::new();
        assert_eq!(client_ip(&headers), None);
        assert_eq!(request_id(&headers), None);
    }

    #[test]
    fn request_id_passed_through() {
        let mut headers = HeaderMap::new();
        headers.insert("x-request-id", "req-42".parse().unwrap());
        assert_eq!(request_id(&headers).as_deref(), Some("req-42"));
    }
}
