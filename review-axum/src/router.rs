use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use review::{
    parse_product_ids, RatingBody, RatingsBody, Reviews, ReviewsBody, SubmitBody, SubmitReview,
    Verifier, PRODUCT_IDS_REQUIRED, PRODUCT_ID_REQUIRED, SUBMIT_REQUIRED,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::{
    error::{
        ApiError, ApiResult, CREATE_REVIEW_FAILED, FETCH_RATINGS_FAILED, FETCH_RATING_FAILED,
        FETCH_REVIEWS_FAILED,
    },
    extract::Authenticated,
};

#[derive(Clone)]
pub struct AppState {
    pub reviews: Reviews,
    pub verifier: Box<dyn Verifier>,
}

impl AppState {
    pub fn new<V: Verifier + 'static>(reviews: Reviews, verifier: V) -> Self {
        Self {
            reviews,
            verifier: Box::new(verifier),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/reviews", get(list_reviews).post(create_review))
        .route("/reviews/rating", get(product_rating))
        .route("/reviews/ratings", get(product_ratings))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    #[serde(rename = "productId")]
    pub product_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    #[serde(rename = "productIds")]
    pub product_ids: Option<String>,
}

fn required(value: Option<String>, message: &str) -> ApiResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest(message.to_owned()))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_reviews(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> ApiResult<Json<ReviewsBody>> {
    let product_id = required(query.product_id, PRODUCT_ID_REQUIRED)?;

    let reviews = state
        .reviews
        .list(&product_id)
        .await
        .map_err(|err| ApiError::review(FETCH_REVIEWS_FAILED, err))?;

    Ok(Json(ReviewsBody { reviews }))
}

async fn create_review(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    input: Result<Json<SubmitReview>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SubmitBody>)> {
    let Json(input) = input.map_err(|err| {
        debug!("rejected review body: {err}");
        ApiError::BadRequest(SUBMIT_REQUIRED.to_owned())
    })?;

    let submitted = state
        .reviews
        .submit(&identity, &input)
        .await
        .map_err(|err| ApiError::review(CREATE_REVIEW_FAILED, err))?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitBody {
            success: true,
            submitted,
        }),
    ))
}

async fn product_rating(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> ApiResult<Json<RatingBody>> {
    let product_id = required(query.product_id, PRODUCT_ID_REQUIRED)?;

    let rating = state
        .reviews
        .rating(&product_id)
        .await
        .map_err(|err| ApiError::review(FETCH_RATING_FAILED, err))?;

    Ok(Json(RatingBody { rating }))
}

async fn product_ratings(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> ApiResult<Json<RatingsBody>> {
    let product_ids = required(query.product_ids, PRODUCT_IDS_REQUIRED)?;

    let ratings = state
        .reviews
        .ratings(&parse_product_ids(&product_ids))
        .await
        .map_err(|err| ApiError::review(FETCH_RATINGS_FAILED, err))?;

    Ok(Json(RatingsBody { ratings }))
}
