use async_trait::async_trait;
use sqlx::PgPool;
use tracing::Instrument;

use crate::error::StoreResult;
use crate::models::UserFeedEntry;

#[async_trait]
pub trait FeedRepository: Send + Sync {
    /// Replaces the whole feed of `user_id` with `entries`.
    async fn replace(&self, user_id: &str, entries: &[UserFeedEntry]) -> StoreResult<()>;

    /// Entries ordered by descending score.
    async fn get(&self, user_id: &str) -> StoreResult<Vec<UserFeedEntry>>;
}

pub struct PgFeedRepository {
    pool: PgPool,
}

impl PgFeedRepository {
    pub fn new(pool: PgPool) -> Self {
        PgFeedRepository { pool }
    }
}

#[async_trait]
impl FeedRepository for PgFeedRepository {
    async fn replace(&self, user_id: &str, entries: &[UserFeedEntry]) -> StoreResult<()> {
        let query_span = tracing::info_span!("Replacing user feed", %user_id, size = entries.len());
        let mut transaction = self.pool.begin().await?;

        sqlx::query("DELETE FROM user_feed WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *transaction)
            .instrument(query_span.clone())
            .await?;

        for entry in entries {
            sqlx::query(
                r#"
                    INSERT INTO user_feed
                        (user_id, film_id, title, director, year, description, actors, genre, score)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(&entry.user_id)
            .bind(&entry.film_id)
            .bind(&entry.title)
            .bind(&entry.director)
            .bind(entry.year)
            .bind(&entry.description)
            .bind(&entry.actors)
            .bind(&entry.genre)
            .bind(entry.score)
            .execute(&mut *transaction)
            .instrument(query_span.clone())
            .await?;
        }

        transaction.commit().await?;
        Ok(())
    }

    async fn get(&self, user_id: &str) -> StoreResult<Vec<UserFeedEntry>> {
        let query_span = tracing::info_span!("Fetching user feed", %user_id);
        let entries = sqlx::query_as::<_, UserFeedEntry>(
            r#"
                SELECT user_id, film_id, title, director, year, description, actors, genre, score
                FROM user_feed WHERE user_id = $1
                ORDER BY score DESC, film_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .instrument(query_span)
        .await?;
        Ok(entries)
    }
}
