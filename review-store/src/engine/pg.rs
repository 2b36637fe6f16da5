use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    engine::Engine,
    error::{Result, StoreError},
    rating::ProductRating,
    review::{Review, WriteReview},
    store::Store,
};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
    prefix: Option<String>,
}

impl PgStore {
    pub fn new(pool: &PgPool) -> Store {
        Store::new(Self {
            pool: pool.clone(),
            prefix: None,
        })
    }

    pub fn with_prefix(pool: &PgPool, prefix: impl Into<String>) -> Store {
        Store::new(Self {
            pool: pool.clone(),
            prefix: Some(prefix.into()),
        })
    }

    /// Creates the review and rating tables if they do not exist yet.
    pub async fn migrate(pool: &PgPool, prefix: Option<&str>) -> Result<()> {
        let engine = Self {
            pool: pool.clone(),
            prefix: prefix.map(ToOwned::to_owned),
        };

        let table_reviews = engine.table_reviews();
        let table_ratings = engine.table_ratings();

        sqlx::query(
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {table_reviews} (
                    id UUID PRIMARY KEY,
                    product_id TEXT NOT NULL,
                    user_id TEXT NOT NULL,
                    user_name TEXT NOT NULL,
                    rating SMALLINT NOT NULL CHECK (rating BETWEEN 1 AND 5),
                    comment TEXT NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL,
                    UNIQUE (product_id, user_id)
                )
                "#
            )
            .as_str(),
        )
        .execute(pool)
        .await?;

        sqlx::query(
            format!(
                "CREATE INDEX IF NOT EXISTS idx_{table_reviews}_product ON {table_reviews} (product_id, created_at DESC)"
            )
            .as_str(),
        )
        .execute(pool)
        .await?;

        sqlx::query(
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {table_ratings} (
                    product_id TEXT PRIMARY KEY,
                    average_rating DOUBLE PRECISION NOT NULL,
                    review_count INTEGER NOT NULL
                )
                "#
            )
            .as_str(),
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    pub fn table(&self, name: impl Into<String>) -> String {
        format!(
            "{}_{}",
            self.prefix.as_ref().unwrap_or(&"rv".to_owned()),
            name.into()
        )
    }

    pub fn table_reviews(&self) -> String {
        self.table("review")
    }

    pub fn table_ratings(&self) -> String {
        self.table("product_rating")
    }
}

#[async_trait]
impl Engine for PgStore {
    async fn write(&self, review: WriteReview) -> Result<(Review, ProductRating)> {
        let table_reviews = self.table_reviews();
        let table_ratings = self.table_ratings();
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(&review.product_id)
            .execute(&mut *tx)
            .await?;

        let existing = sqlx::query_as::<_, (Uuid,)>(
            format!("SELECT id FROM {table_reviews} WHERE product_id = $1 AND user_id = $2")
                .as_str(),
        )
        .bind(&review.product_id)
        .bind(&review.user_id)
        .fetch_optional(&mut *tx)
        .await?;

        if existing.is_some() {
            tx.rollback().await?;

            return Err(StoreError::DuplicateReview);
        }

        let review = review.to_review();

        sqlx::query(
            format!(
                "INSERT INTO {table_reviews} (id, product_id, user_id, user_name, rating, comment, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7)"
            )
            .as_str(),
        )
        .bind(review.id)
        .bind(&review.product_id)
        .bind(&review.user_id)
        .bind(&review.user_name)
        .bind(i16::from(review.rating))
        .bind(&review.comment)
        .bind(review.created_at)
        .execute(&mut *tx)
        .await?;

        let ratings = sqlx::query_as::<_, (i16,)>(
            format!("SELECT rating FROM {table_reviews} WHERE product_id = $1").as_str(),
        )
        .bind(&review.product_id)
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .map(|(rating,)| u8::try_from(rating))
        .collect::<std::result::Result<Vec<_>, _>>()?;

        let rating = ProductRating::from_ratings(&review.product_id, ratings)
            .ok_or(StoreError::EmptyRatings)?;

        sqlx::query(
            format!(
                r#"
                INSERT INTO {table_ratings} (product_id, average_rating, review_count)
                VALUES ($1, $2, $3)
                ON CONFLICT (product_id)
                DO UPDATE SET average_rating = EXCLUDED.average_rating, review_count = EXCLUDED.review_count
                "#
            )
            .as_str(),
        )
        .bind(&rating.product_id)
        .bind(rating.average_rating)
        .bind(i32::try_from(rating.review_count)?)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((review, rating))
    }

    async fn read(&self, product_id: &'_ str) -> Result<Vec<Review>> {
        let table_reviews = self.table_reviews();
        let rows = sqlx::query_as::<_, ReviewRow>(
            format!(
                r#"
                SELECT * FROM {table_reviews}
                WHERE product_id = $1
                ORDER BY created_at DESC, id DESC
                "#
            )
            .as_str(),
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Review::try_from).collect()
    }

    async fn rating(&self, product_id: &'_ str) -> Result<Option<ProductRating>> {
        let table_ratings = self.table_ratings();
        let row = sqlx::query_as::<_, RatingRow>(
            format!("SELECT * FROM {table_ratings} WHERE product_id = $1").as_str(),
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ProductRating::try_from).transpose()
    }

    async fn ratings(&self, product_ids: &'_ [String]) -> Result<Vec<ProductRating>> {
        let table_ratings = self.table_ratings();
        let rows = sqlx::query_as::<_, RatingRow>(
            format!("SELECT * FROM {table_ratings} WHERE product_id = ANY($1)").as_str(),
        )
        .bind(product_ids.to_vec())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ProductRating::try_from).collect()
    }
}

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: Uuid,
    product_id: String,
    user_id: String,
    user_name: String,
    rating: i16,
    comment: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = StoreError;

    fn try_from(row: ReviewRow) -> Result<Self> {
        Ok(Review {
            id: row.id,
            product_id: row.product_id,
            user_id: row.user_id,
            user_name: row.user_name,
            rating: u8::try_from(row.rating)?,
            comment: row.comment,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RatingRow {
    product_id: String,
    average_rating: f64,
    review_count: i32,
}

impl TryFrom<RatingRow> for ProductRating {
    type Error = StoreError;

    fn try_from(row: RatingRow) -> Result<Self> {
        Ok(ProductRating {
            product_id: row.product_id,
            average_rating: row.average_rating,
            review_count: u32::try_from(row.review_count)?,
        })
    }
}
