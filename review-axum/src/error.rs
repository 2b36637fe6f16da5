use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use review::{ErrorBody, ReviewError, VerifyError};
use tracing::{error, warn};

pub const AUTHENTICATION_REQUIRED: &str = "Authentication required";
pub const INVALID_TOKEN: &str = "Invalid token";

pub const FETCH_REVIEWS_FAILED: &str = "Failed to fetch reviews";
pub const CREATE_REVIEW_FAILED: &str = "Failed to create review";
pub const FETCH_RATING_FAILED: &str = "Failed to fetch product rating";
pub const FETCH_RATINGS_FAILED: &str = "Failed to fetch product ratings";

/// Failure of an HTTP request, rendered as `{"error": "<message>"}`.
///
/// Internal failures only expose their context message, the source is logged.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Authentication required")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("{context}")]
    Internal {
        context: &'static str,
        source: anyhow::Error,
    },
}

impl ApiError {
    pub fn internal(context: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self::Internal {
            context,
            source: source.into(),
        }
    }

    /// Maps a service failure, using `context` as the message of store failures.
    pub fn review(context: &'static str, err: ReviewError) -> Self {
        match err {
            ReviewError::Validation(message) => Self::BadRequest(message),
            ReviewError::Duplicate => Self::BadRequest(err.to_string()),
            ReviewError::Store(err) => Self::internal(context, err),
        }
    }

    pub fn verify(err: VerifyError) -> Self {
        Self::internal(CREATE_REVIEW_FAILED, err)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingToken | ApiError::InvalidToken => StatusCode::UNAUTHORIZED,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            ApiError::Internal { context, source } => error!("{context}: {source:?}"),
            err => warn!(status = status.as_u16(), "{err}"),
        }

        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use review::store::StoreError;

    use super::*;

    #[test]
    fn review_errors_status() {
        let err = ApiError::review(
            FETCH_REVIEWS_FAILED,
            ReviewError::Validation("Product ID is required".to_owned()),
        );
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Product ID is required");

        let err = ApiError::review(CREATE_REVIEW_FAILED, ReviewError::Duplicate);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "You have already reviewed this product");

        let err = ApiError::review(
            FETCH_RATING_FAILED,
            ReviewError::Store(StoreError::EmptyRatings),
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), FETCH_RATING_FAILED);
    }

    #[test]
    fn auth_errors_status() {
        assert_eq!(ApiError::MissingToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::MissingToken.to_string(), AUTHENTICATION_REQUIRED);
        assert_eq!(ApiError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::InvalidToken.to_string(), INVALID_TOKEN);
    }
}
