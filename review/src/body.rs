use std::collections::HashMap;

use review_store::{ProductRating, Rating, Review};
use serde::{Deserialize, Serialize};

/// Outcome of a successful submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submitted {
    pub review: Review,
    pub new_rating: f64,
    pub review_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitBody {
    pub success: bool,
    #[serde(flatten)]
    pub submitted: Submitted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewsBody {
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingBody {
    pub rating: Option<ProductRating>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingsBody {
    pub ratings: HashMap<String, Rating>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
