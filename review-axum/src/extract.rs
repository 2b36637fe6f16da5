use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use review::Identity;

use crate::{error::ApiError, router::AppState};

/// Identity of the caller, resolved from an `Authorization: Bearer <token>`
/// header by the application's verifier.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(ApiError::MissingToken)?;

        match state.verifier.verify(token).await {
            Ok(Some(identity)) => Ok(Self(identity)),
            Ok(None) => Err(ApiError::InvalidToken),
            Err(err) => Err(ApiError::verify(err)),
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .split(' ')
        .nth(1)
        .filter(|token| !token.is_empty())
}
