use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::Instrument;

use crate::error::{StoreError, StoreResult};
use crate::models::{Rating, Review};

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn put(&self, review: &Review) -> StoreResult<()>;

    async fn list_by_user(&self, user_id: &str) -> StoreResult<Vec<Review>>;
}

pub struct PgReviewRepository {
    pool: PgPool,
}

impl PgReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        PgReviewRepository { pool }
    }
}

#[async_trait]
impl ReviewRepository for PgReviewRepository {
    async fn put(&self, review: &Review) -> StoreResult<()> {
        let query_span = tracing::info_span!("Saving review", review_id = %review.review_id);
        sqlx::query(
            r#"
                INSERT INTO reviews (review_id, user_id, film_id, rating_type, rating, comment, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(review.review_id)
        .bind(&review.user_id)
        .bind(&review.film_id)
        .bind(review.rating.rating_type())
        .bind(review.rating.stored_value())
        .bind(&review.comment)
        .bind(review.timestamp)
        .execute(&self.pool)
        .instrument(query_span)
        .await?;
        Ok(())
    }

    async fn list_by_user(&self, user_id: &str) -> StoreResult<Vec<Review>> {
        let query_span = tracing::info_span!("Fetching user reviews", %user_id);
        let rows = sqlx::query(
            r#"
                SELECT review_id, user_id, film_id, rating_type, rating, comment, created_at
                FROM reviews WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .instrument(query_span)
        .await?;

        rows.into_iter()
            .map(|row| -> StoreResult<Review> {
                let rating_type: String = row.try_get("rating_type")?;
                let rating_value: String = row.try_get("rating")?;
                let rating = Rating::from_stored(&rating_type, &rating_value).map_err(|err| {
                    StoreError::Backend(format!("corrupt rating in review table: {}", err))
                })?;
                Ok(Review {
                    review_id: row.try_get("review_id")?,
                    user_id: row.try_get("user_id")?,
                    film_id: row.try_get("film_id")?,
                    rating,
                    comment: row.try_get("comment")?,
                    timestamp: row.try_get("created_at")?,
                })
            })
            .collect()
    }
}
