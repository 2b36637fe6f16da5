use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use parking_lot::Mutex;
use review::Rating;
use review_client::{ClientError, Fetcher, Result};

pub fn rating(average_rating: f64, review_count: u32) -> Rating {
    Rating {
        average_rating,
        review_count,
    }
}

/// In-memory fetcher recording every batch it is asked for.
#[derive(Clone, Default)]
pub struct MockFetcher {
    ratings: Arc<Mutex<HashMap<String, Rating>>>,
    calls: Arc<Mutex<Vec<Vec<String>>>>,
    delay: Option<Duration>,
    failing: bool,
}

impl MockFetcher {
    pub fn new<const N: usize>(ratings: [(&str, Rating); N]) -> Self {
        Self {
            ratings: Arc::new(Mutex::new(
                ratings
                    .into_iter()
                    .map(|(id, rating)| (id.to_owned(), rating))
                    .collect(),
            )),
            ..Self::default()
        }
    }

    pub fn delay(mut self, value: Duration) -> Self {
        self.delay = Some(value);
        self
    }

    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, product_ids: &'_ [String]) -> Result<HashMap<String, Rating>> {
        self.calls.lock().push(product_ids.to_vec());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing {
            return Err(ClientError::Status {
                status: 500,
                message: "Failed to fetch product ratings".to_owned(),
            });
        }

        let ratings = self.ratings.lock();

        Ok(product_ids
            .iter()
            .filter_map(|id| ratings.get(id).map(|rating| (id.to_owned(), *rating)))
            .collect())
    }
}
