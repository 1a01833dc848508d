use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::sync::Arc;
use veridia_core::AppError;

use crate::auth::jwt::decode_token;
use crate::error::HttpAppError;
use crate::state::AppState;

/// Authenticated caller, resolved from a `Bearer` access token.
///
/// Used as a plain extractor rather than middleware so it composes with
/// `Multipart`, which must be the last extractor in a handler.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub email: String,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = HttpAppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing Authorization header".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("expected Bearer token".to_string()))?;

        let claims = decode_token(token, state.config.jwt_secret())?;
        Ok(AuthUser { email: claims.sub })
    }
}
