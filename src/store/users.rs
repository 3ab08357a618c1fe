use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::models::{NewUser, User, UserGroup};

/// Account and group storage of the identity provider.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` when the username or email is taken.
    async fn create(&self, user: &NewUser) -> StoreResult<User>;

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Fails with `Conflict` when a group with that name (ignoring case) exists.
    async fn create_group(&self, group: &UserGroup) -> StoreResult<()>;

    async fn find_group(&self, name: &str) -> StoreResult<Option<UserGroup>>;

    /// Fails with `NotFound` when the group does not exist.
    async fn add_to_group(&self, user_id: Uuid, group: &str) -> StoreResult<()>;

    async fn groups_of(&self, user_id: Uuid) -> StoreResult<Vec<String>>;
}

const USER_COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, \
     date_of_birth, role, confirmed, created_at";

fn map_unique_violation(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StoreError::Conflict,
        other => StoreError::Database(other),
    }
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        PgUserRepository { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &NewUser) -> StoreResult<User> {
        let query_span = tracing::info_span!("Saving new user details in the database", username = %user.username);
        // Accounts are confirmed on creation; there is no verification step.
        let created = sqlx::query_as::<_, User>(&format!(
            r#"
                INSERT INTO users
                    (id, username, email, password_hash, first_name, last_name, date_of_birth, role, confirmed, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE, $9)
                RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.date_of_birth)
        .bind(&user.role)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .instrument(query_span)
        .await
        .map_err(map_unique_violation)?;
        Ok(created)
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let query_span = tracing::info_span!("Fetching user by username", %username);
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .instrument(query_span)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let query_span = tracing::info_span!("Fetching user by id", %id);
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .instrument(query_span)
        .await?;
        Ok(user)
    }

    async fn create_group(&self, group: &UserGroup) -> StoreResult<()> {
        let query_span = tracing::info_span!("Creating group", name = %group.name);
        sqlx::query("INSERT INTO user_groups (name, description) VALUES ($1, $2)")
            .bind(&group.name)
            .bind(&group.description)
            .execute(&self.pool)
            .instrument(query_span)
            .await
            .map_err(map_unique_violation)?;
        Ok(())
    }

    async fn find_group(&self, name: &str) -> StoreResult<Option<UserGroup>> {
        let query_span = tracing::info_span!("Fetching group", %name);
        let group = sqlx::query_as::<_, UserGroup>(
            "SELECT name, description FROM user_groups WHERE lower(name) = lower($1)",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .instrument(query_span)
        .await?;
        Ok(group)
    }

    async fn add_to_group(&self, user_id: Uuid, group: &str) -> StoreResult<()> {
        let query_span = tracing::info_span!("Adding user to group", %user_id, %group);
        let result = sqlx::query(
            r#"
                INSERT INTO group_members (user_id, group_name)
                SELECT $1, name FROM user_groups WHERE lower(name) = lower($2)
                ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(group)
        .execute(&self.pool)
        .instrument(query_span)
        .await?;
        if result.rows_affected() == 0 && self.find_group(group).await?.is_none() {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn groups_of(&self, user_id: Uuid) -> StoreResult<Vec<String>> {
        let query_span = tracing::info_span!("Fetching user groups", %user_id);
        let rows = sqlx::query("SELECT group_name FROM group_members WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&self.pool)
            .instrument(query_span)
            .await?;
        rows.into_iter()
            .map(|row| row.try_get::<String, _>("group_name").map_err(StoreError::from))
            .collect()
    }
}
