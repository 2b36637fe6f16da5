use std::collections::{HashMap, HashSet};

use review_store::{ProductRating, Rating, Review, Store, WriteReview};
use tracing::{debug, info};
use validator::Validate;

use crate::{
    auth::Identity,
    body::Submitted,
    config::ReviewConfig,
    error::{Result, ReviewError},
    input::{SubmitReview, PRODUCT_IDS_REQUIRED, PRODUCT_ID_REQUIRED, SUBMIT_REQUIRED},
};

/// Review submission and rating lookups over a [`Store`].
#[derive(Clone)]
pub struct Reviews {
    store: Store,
    config: ReviewConfig,
}

impl Reviews {
    pub fn new(store: Store) -> Self {
        Self::with_config(store, ReviewConfig::default())
    }

    pub fn with_config(store: Store, config: ReviewConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &ReviewConfig {
        &self.config
    }

    /// Records a review and returns it together with the product's new
    /// average rating and review count.
    ///
    /// A user can review a product only once, a second submission fails with
    /// [`ReviewError::Duplicate`] and leaves the rating untouched.
    pub async fn submit(&self, identity: &Identity, input: &SubmitReview) -> Result<Submitted> {
        input.validate()?;
        self.check_product_id(&input.product_id, SUBMIT_REQUIRED)?;

        let rating = u8::try_from(input.rating)
            .map_err(|_| ReviewError::Validation(SUBMIT_REQUIRED.to_owned()))?;

        let comment = input.comment.clone().unwrap_or_default();

        if comment.chars().count() > self.config.max_comment_len {
            return Err(ReviewError::Validation(format!(
                "Comment must be at most {} characters",
                self.config.max_comment_len
            )));
        }

        let (review, product_rating) = self
            .store
            .write(
                WriteReview::new(&input.product_id, &identity.id)
                    .user_name(&identity.name)
                    .rating(rating)
                    .comment(comment),
            )
            .await?;

        info!(
            product_id = %review.product_id,
            user_id = %review.user_id,
            average_rating = product_rating.average_rating,
            review_count = product_rating.review_count,
            "review submitted"
        );

        Ok(Submitted {
            review,
            new_rating: product_rating.average_rating,
            review_count: product_rating.review_count,
        })
    }

    /// Reviews of a product, newest first. Empty when nobody reviewed it.
    pub async fn list(&self, product_id: &str) -> Result<Vec<Review>> {
        self.check_product_id(product_id, PRODUCT_ID_REQUIRED)?;

        Ok(self.store.read(product_id).await?)
    }

    /// Rating of a product, `None` until its first review.
    pub async fn rating(&self, product_id: &str) -> Result<Option<ProductRating>> {
        self.check_product_id(product_id, PRODUCT_ID_REQUIRED)?;

        Ok(self.store.rating(product_id).await?)
    }

    /// Ratings of several products at once.
    ///
    /// Only products that have a rating appear in the returned map.
    pub async fn ratings(&self, product_ids: &[String]) -> Result<HashMap<String, Rating>> {
        if product_ids.is_empty() {
            return Err(ReviewError::Validation(PRODUCT_IDS_REQUIRED.to_owned()));
        }

        let mut seen = HashSet::new();
        let mut ids = Vec::new();

        for id in product_ids {
            self.check_product_id(id, PRODUCT_IDS_REQUIRED)?;

            if seen.insert(id.as_str()) {
                ids.push(id.to_owned());
            }
        }

        if ids.len() > self.config.max_batch_size {
            return Err(ReviewError::Validation(format!(
                "At most {} product IDs can be requested at once",
                self.config.max_batch_size
            )));
        }

        let ratings = self.store.ratings(ids).await?;

        debug!(
            requested = seen.len(),
            found = ratings.len(),
            "product ratings loaded"
        );

        Ok(ratings
            .into_iter()
            .map(|rating| {
                let value = rating.to_rating();
                (rating.product_id, value)
            })
            .collect())
    }

    fn check_product_id(&self, product_id: &str, message: &str) -> Result<()> {
        if product_id.trim().is_empty()
            || product_id.chars().count() > self.config.max_product_id_len
        {
            return Err(ReviewError::Validation(message.to_owned()));
        }

        Ok(())
    }
}
