use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::Instrument;

use crate::error::{StoreError, StoreResult};
use crate::models::{Subscription, SubscriptionType};

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn put(&self, subscription: &Subscription) -> StoreResult<()>;

    async fn list_by_user(&self, user_id: &str) -> StoreResult<Vec<Subscription>>;

    /// Fails with `NotFound` when no subscription matches all three fields.
    async fn delete(&self, subscription: &Subscription) -> StoreResult<()>;

    /// User ids subscribed to exactly this type and value.
    async fn subscribers(&self, kind: SubscriptionType, value: &str) -> StoreResult<Vec<String>>;
}

pub struct PgSubscriptionRepository {
    pool: PgPool,
}

impl PgSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        PgSubscriptionRepository { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    async fn put(&self, subscription: &Subscription) -> StoreResult<()> {
        let query_span = tracing::info_span!("Saving subscription", ?subscription);
        sqlx::query(
            r#"
                INSERT INTO subscriptions (user_id, subscription_type, subscription_value)
                VALUES ($1, $2, $3)
                ON CONFLICT DO NOTHING
            "#,
        )
        .bind(&subscription.user_id)
        .bind(subscription.subscription_type.as_str())
        .bind(&subscription.subscription_value)
        .execute(&self.pool)
        .instrument(query_span)
        .await?;
        Ok(())
    }

    async fn list_by_user(&self, user_id: &str) -> StoreResult<Vec<Subscription>> {
        let query_span = tracing::info_span!("Fetching user subscriptions", %user_id);
        let rows = sqlx::query(
            r#"
                SELECT user_id, subscription_type, subscription_value
                FROM subscriptions WHERE user_id = $1
                ORDER BY subscription_type, subscription_value
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .instrument(query_span)
        .await?;

        rows.into_iter()
            .map(|row| -> StoreResult<Subscription> {
                let kind: String = row.try_get("subscription_type")?;
                Ok(Subscription {
                    user_id: row.try_get("user_id")?,
                    subscription_type: kind.parse::<SubscriptionType>().map_err(StoreError::Backend)?,
                    subscription_value: row.try_get("subscription_value")?,
                })
            })
            .collect()
    }

    async fn delete(&self, subscription: &Subscription) -> StoreResult<()> {
        let query_span = tracing::info_span!("Deleting subscription", ?subscription);
        let result = sqlx::query(
            r#"
                DELETE FROM subscriptions
                WHERE user_id = $1 AND subscription_type = $2 AND subscription_value = $3
            "#,
        )
        .bind(&subscription.user_id)
        .bind(subscription.subscription_type.as_str())
        .bind(&subscription.subscription_value)
        .execute(&self.pool)
        .instrument(query_span)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn subscribers(&self, kind: SubscriptionType, value: &str) -> StoreResult<Vec<String>> {
        let query_span = tracing::info_span!("Fetching subscribers", %kind, %value);
        let rows = sqlx::query(
            r#"
                SELECT user_id FROM subscriptions
                WHERE subscription_type = $1 AND subscription_value = $2
            "#,
        )
        .bind(kind.as_str())
        .bind(value)
        .fetch_all(&self.pool)
        .instrument(query_span)
        .await?;
        rows.into_iter()
            .map(|row| row.try_get::<String, _>("user_id").map_err(StoreError::from))
            .collect()
    }
}
