use actix_web::{
    web::{Data, Query},
    HttpResponse,
};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::util::is_blank;
use crate::configuration::Settings;
use crate::store::ObjectStore;

#[derive(Deserialize, Debug)]
pub struct UploadUrlQuery {
    pub film_id: Option<String>,
    pub file_name: Option<String>,
}

pub async fn get_upload_url(
    query: Query<UploadUrlQuery>,
    objects: Data<dyn ObjectStore>,
    settings: Data<Settings>,
) -> HttpResponse {
    if is_blank(&query.film_id) || is_blank(&query.file_name) {
        return HttpResponse::BadRequest().json(json!({
            "error": "film_id and file_name are required"
        }));
    }
    let key = format!(
        "{}-{}",
        query.film_id.as_deref().unwrap_or_default(),
        query.file_name.as_deref().unwrap_or_default()
    );
    let expires_in = Duration::from_secs(settings.storage.presign_expiry_secs);
    match objects.presigned_upload_url(&key, expires_in).await {
        Ok(url) => HttpResponse::Ok().json(json!({
            "data": {
                "upload_url": url,
                "key": key,
                "expires_in": expires_in.as_secs()
            }
        })),
        Err(err) => {
            tracing::error!("Couldn't get a presigned PUT URL for object '{}': {}", key, err);
            HttpResponse::InternalServerError().json(json!({
                "error": "Error generating upload URL"
            }))
        }
    }
}
