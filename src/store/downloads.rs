use async_trait::async_trait;
use sqlx::PgPool;
use tracing::Instrument;

use crate::error::StoreResult;
use crate::models::DownloadRecord;

#[async_trait]
pub trait DownloadRepository: Send + Sync {
    async fn record(&self, download: &DownloadRecord) -> StoreResult<()>;

    async fn list_by_user(&self, user_id: &str) -> StoreResult<Vec<DownloadRecord>>;
}

pub struct PgDownloadRepository {
    pool: PgPool,
}

impl PgDownloadRepository {
    pub fn new(pool: PgPool) -> Self {
        PgDownloadRepository { pool }
    }
}

#[async_trait]
impl DownloadRepository for PgDownloadRepository {
    async fn record(&self, download: &DownloadRecord) -> StoreResult<()> {
        let query_span = tracing::info_span!(
            "Recording download",
            user_id = %download.user_id,
            film_id = %download.film_id
        );
        sqlx::query(
            r#"
                INSERT INTO downloads (user_id, film_id, downloaded_at)
                VALUES ($1, $2, $3)
            "#,
        )
        .bind(&download.user_id)
        .bind(&download.film_id)
        .bind(download.downloaded_at)
        .execute(&self.pool)
        .instrument(query_span)
        .await?;
        Ok(())
    }

    async fn list_by_user(&self, user_id: &str) -> StoreResult<Vec<DownloadRecord>> {
        let query_span = tracing::info_span!("Fetching user downloads", %user_id);
        let downloads = sqlx::query_as::<_, DownloadRecord>(
            r#"
                SELECT user_id, film_id, downloaded_at
                FROM downloads WHERE user_id = $1
                ORDER BY downloaded_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .instrument(query_span)
        .await?;
        Ok(downloads)
    }
}
