use async_trait::async_trait;
use parking_lot::RwLock;
use std::{collections::HashMap, sync::Arc};

use crate::{
    engine::Engine,
    error::{Result, StoreError},
    rating::ProductRating,
    review::{sort_newest_first, Review, WriteReview},
    store::Store,
};

#[derive(Debug, Default)]
struct Collections {
    reviews: HashMap<String, Vec<Review>>,
    ratings: HashMap<String, ProductRating>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore(Arc<RwLock<Collections>>);

impl MemoryStore {
    pub fn new() -> Store {
        Store::new(Self::default())
    }
}

#[async_trait]
impl Engine for MemoryStore {
    async fn write(&self, review: WriteReview) -> Result<(Review, ProductRating)> {
        // One write guard over both collections keeps the insert and the
        // recomputed rating atomic and serialized.
        let mut data = self.0.write();
        let reviews = data.reviews.entry(review.product_id.to_owned()).or_default();

        if reviews.iter().any(|r| r.user_id == review.user_id) {
            return Err(StoreError::DuplicateReview);
        }

        let review = review.to_review();
        reviews.push(review.clone());

        let rating =
            ProductRating::from_ratings(&review.product_id, reviews.iter().map(|r| r.rating))
                .ok_or(StoreError::EmptyRatings)?;

        data.ratings
            .insert(review.product_id.to_owned(), rating.clone());

        Ok((review, rating))
    }

    async fn read(&self, product_id: &'_ str) -> Result<Vec<Review>> {
        let mut reviews = match self.0.read().reviews.get(product_id) {
            Some(reviews) => reviews.clone(),
            _ => return Ok(vec![]),
        };

        sort_newest_first(&mut reviews);

        Ok(reviews)
    }

    async fn rating(&self, product_id: &'_ str) -> Result<Option<ProductRating>> {
        Ok(self.0.read().ratings.get(product_id).cloned())
    }

    async fn ratings(&self, product_ids: &'_ [String]) -> Result<Vec<ProductRating>> {
        let data = self.0.read();

        Ok(product_ids
            .iter()
            .filter_map(|id| data.ratings.get(id).cloned())
            .collect())
    }
}
