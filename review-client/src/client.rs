use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::{Client, Response};
use review::{
    ErrorBody, ProductRating, Rating, RatingBody, RatingsBody, Review, ReviewsBody, SubmitBody,
    SubmitReview, Submitted,
};
use serde::de::DeserializeOwned;

use crate::{
    batch::Fetcher,
    config::ClientConfig,
    error::{ClientError, Result},
};

/// Client of the review HTTP routes.
#[derive(Debug, Clone)]
pub struct RatingsClient {
    base: String,
    client: Client,
}

impl RatingsClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            base: config.base_url.to_owned(),
            client,
        })
    }

    pub async fn reviews(&self, product_id: &str) -> Result<Vec<Review>> {
        let resp = self
            .client
            .get(format!("{}/reviews", self.base))
            .query(&[("productId", product_id)])
            .send()
            .await?;

        let body: ReviewsBody = json(resp).await?;

        Ok(body.reviews)
    }

    pub async fn rating(&self, product_id: &str) -> Result<Option<ProductRating>> {
        let resp = self
            .client
            .get(format!("{}/reviews/rating", self.base))
            .query(&[("productId", product_id)])
            .send()
            .await?;

        let body: RatingBody = json(resp).await?;

        Ok(body.rating)
    }

    pub async fn ratings(&self, product_ids: &[String]) -> Result<HashMap<String, Rating>> {
        let resp = self
            .client
            .get(format!("{}/reviews/ratings", self.base))
            .query(&[("productIds", product_ids.join(","))])
            .send()
            .await?;

        let body: RatingsBody = json(resp).await?;

        Ok(body.ratings)
    }

    pub async fn submit(&self, token: &str, input: &SubmitReview) -> Result<Submitted> {
        let resp = self
            .client
            .post(format!("{}/reviews", self.base))
            .bearer_auth(token)
            .json(input)
            .send()
            .await?;

        let body: SubmitBody = json(resp).await?;

        Ok(body.submitted)
    }
}

#[async_trait]
impl Fetcher for RatingsClient {
    async fn fetch(&self, product_ids: &'_ [String]) -> Result<HashMap<String, Rating>> {
        self.ratings(product_ids).await
    }
}

async fn json<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let status = resp.status();

    if status.is_success() {
        return Ok(resp.json().await?);
    }

    let message = match resp.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status.canonical_reason().unwrap_or_default().to_owned(),
    };

    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}
