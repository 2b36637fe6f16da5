use async_trait::async_trait;
use dyn_clone::DynClone;

use crate::{
    error::Result,
    rating::ProductRating,
    review::{Review, WriteReview},
};

#[cfg(feature = "memory")]
mod memory;
#[cfg(feature = "pg")]
mod pg;

#[cfg(feature = "memory")]
pub use memory::*;
#[cfg(feature = "pg")]
pub use pg::*;

#[async_trait]
pub trait Engine: DynClone + Send + Sync {
    /// Persists a review and replaces the rating of its product with one
    /// recomputed from every review of that product.
    ///
    /// Runs as a single unit serialized per product: either both the review
    /// and the rating are written or neither is. Fails with
    /// [`crate::StoreError::DuplicateReview`] if the user already reviewed
    /// the product.
    async fn write(&self, review: WriteReview) -> Result<(Review, ProductRating)>;

    /// Every review of a product, newest first.
    async fn read(&self, product_id: &'_ str) -> Result<Vec<Review>>;

    async fn rating(&self, product_id: &'_ str) -> Result<Option<ProductRating>>;

    /// Ratings of the given products. Products without a rating are left out.
    async fn ratings(&self, product_ids: &'_ [String]) -> Result<Vec<ProductRating>>;
}

dyn_clone::clone_trait_object!(Engine);
