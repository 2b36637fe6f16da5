#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("a review already exists for this product and user")]
    DuplicateReview,

    #[error("unexpected empty reviews while computing product rating")]
    EmptyRatings,

    #[cfg(feature = "pg")]
    #[error("sqlx `{0}`")]
    Sqlx(#[from] sqlx::Error),

    #[error("std::num `{0}`")]
    TryFromInt(#[from] std::num::TryFromIntError),

    #[error("{0}")]
    Any(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
