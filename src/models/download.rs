use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct DownloadRecord {
    pub user_id: String,
    pub film_id: String,
    pub downloaded_at: DateTime<Utc>,
}
