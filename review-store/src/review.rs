use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A review as submitted, before the store assigns its identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReview {
    pub product_id: String,
    pub user_id: String,
    pub user_name: String,
    pub rating: u8,
    pub comment: String,
}

impl WriteReview {
    pub fn new(product_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    pub fn user_name(mut self, value: impl Into<String>) -> Self {
        self.user_name = value.into();
        self
    }

    pub fn rating(mut self, value: u8) -> Self {
        self.rating = value;
        self
    }

    pub fn comment(mut self, value: impl Into<String>) -> Self {
        self.comment = value.into();
        self
    }

    pub fn to_review(&self) -> Review {
        Review {
            product_id: self.product_id.to_owned(),
            user_id: self.user_id.to_owned(),
            user_name: self.user_name.to_owned(),
            rating: self.rating,
            comment: self.comment.to_owned(),
            ..Default::default()
        }
    }
}

/// A persisted review. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub product_id: String,
    pub user_id: String,
    pub user_name: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl Default for Review {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            product_id: String::default(),
            user_id: String::default(),
            user_name: String::default(),
            rating: u8::default(),
            comment: String::default(),
            created_at: Utc::now(),
        }
    }
}

/// Newest first, ties broken by id so the order is stable.
pub fn sort_newest_first(reviews: &mut [Review]) {
    reviews.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
