//! Bearer token extraction.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

use crate::auth::Claims;
use crate::error::AppError;
use crate::server::AppState;

/// Claims of the authenticated caller
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

/// Extract bearer token from Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers).ok_or_else(|| {
            tracing::warn!("Missing bearer token");
            AppError::Auth("Missing bearer token".to_string())
        })?;

        let claims = state.jwt_validator.validate(token)?;
        Ok(AuthUser(claims))
    }
}
