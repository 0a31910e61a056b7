use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::api_client::AccessToken;
use crate::errors::AppError;

/// Caller's bearer token, required on every `/api` route.
/// Rejects before any upstream call when the header is missing or malformed.
pub struct BearerToken(pub AccessToken);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;
        let token = AccessToken::from_authorization(header).map_err(|_| AppError::Unauthorized)?;
        Ok(BearerToken(token))
    }
}
