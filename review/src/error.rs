use review_store::StoreError;
use validator::ValidationErrors;

use crate::input::SUBMIT_REQUIRED;

#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("{0}")]
    Validation(String),

    #[error("You have already reviewed this product")]
    Duplicate,

    #[error("store `{0}`")]
    Store(StoreError),
}

impl From<StoreError> for ReviewError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::DuplicateReview => Self::Duplicate,
            err => Self::Store(err),
        }
    }
}

impl From<ValidationErrors> for ReviewError {
    fn from(_: ValidationErrors) -> Self {
        Self::Validation(SUBMIT_REQUIRED.to_owned())
    }
}

pub type Result<T> = std::result::Result<T, ReviewError>;
