//! Bearer-token caller extraction.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use valuenum_core::{bearer_token, Claims};

use crate::{error::AppError, state::AppState};

/// The caller behind a request, if it presented a token.
///
/// A missing `Authorization` header is anonymous; a present but invalid
/// one is rejected with 401.
pub struct Caller(pub Option<Claims>);

impl Caller {
    pub fn id(&self) -> Option<&str> {
        self.0.as_ref().map(|claims| claims.sub.as_str())
    }
}

/// A caller that must be authenticated.
pub struct Authenticated(pub Claims);

impl FromRequestParts<Arc<AppState>> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(Caller(None));
        };
        let header = header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Authorization header is not valid text".into()))?;
        let token = bearer_token(header)
            .ok_or_else(|| AppError::Unauthorized("Expected 'Bearer <token>'".into()))?;
        let signer = state
            .signer
            .as_ref()
            .ok_or_else(|| AppError::Unauthorized("Token verification is not configured".into()))?;

        Ok(Caller(Some(signer.verify(token)?)))
    }
}

impl FromRequestParts<Arc<AppState>> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match Caller::from_request_parts(parts, state).await? {
            Caller(Some(claims)) => Ok(Authenticated(claims)),
            Caller(None) => Err(AppError::Unauthorized("Not authenticated".into())),
        }
    }
}
