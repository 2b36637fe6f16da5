use std::collections::HashSet;

use crate::{
    engine::Engine,
    error::Result,
    rating::ProductRating,
    review::{Review, WriteReview},
};

#[derive(Clone)]
pub struct Store {
    pub(crate) engine: Box<dyn Engine>,
}

impl Store {
    pub fn new<E: Engine + 'static>(engine: E) -> Self {
        Self {
            engine: Box::new(engine),
        }
    }

    pub async fn write(&self, review: WriteReview) -> Result<(Review, ProductRating)> {
        self.engine.write(review).await
    }

    pub async fn read(&self, product_id: impl AsRef<str>) -> Result<Vec<Review>> {
        self.engine.read(product_id.as_ref()).await
    }

    pub async fn rating(&self, product_id: impl AsRef<str>) -> Result<Option<ProductRating>> {
        self.engine.rating(product_id.as_ref()).await
    }

    /// Ratings of the given products, asking the engine once per distinct id.
    pub async fn ratings<I, S>(&self, product_ids: I) -> Result<Vec<ProductRating>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let product_ids = product_ids
            .into_iter()
            .map(Into::into)
            .filter(|id: &String| seen.insert(id.to_owned()))
            .collect::<Vec<_>>();

        if product_ids.is_empty() {
            return Ok(vec![]);
        }

        self.engine.ratings(&product_ids).await
    }
}
