use actix_web::{
    web::{Data, Path, Query},
    HttpRequest, HttpResponse,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::util::encode_file;
use crate::error::StoreError;
use crate::middleware::request_principal;
use crate::models::{DownloadRecord, Film};
use crate::services::transcoding::Resolution;
use crate::store::{DownloadRepository, FilmRepository, ObjectStore};

#[derive(Deserialize, Debug)]
pub struct DownloadQuery {
    pub resolution: Option<String>,
}

/// Serves the original or a transcoded variant and records the download
/// for the caller.
pub async fn download_film(
    req: HttpRequest,
    film_id: Path<String>,
    query: Query<DownloadQuery>,
    films: Data<dyn FilmRepository>,
    objects: Data<dyn ObjectStore>,
    downloads: Data<dyn DownloadRepository>,
) -> HttpResponse {
    let principal = match request_principal(&req) {
        Some(principal) => principal,
        None => {
            tracing::info!("Principal not found in req object");
            return HttpResponse::Unauthorized().json(json!({
                "error": "Missing authorization token"
            }));
        }
    };
    let film_id = film_id.into_inner();

    let key = match query.resolution.as_deref() {
        Some(resolution) => match Resolution::parse(resolution) {
            Ok(resolution) => Film::variant_key(&film_id, resolution.label()),
            Err(err) => {
                return HttpResponse::BadRequest().json(json!({
                    "error": err.to_string()
                }));
            }
        },
        None => Film::content_key(&film_id),
    };

    match films.get(&film_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return HttpResponse::NotFound().json(json!({
                "error": "Film not found"
            }));
        }
        Err(err) => {
            tracing::error!("Failed to read film {}: {}", film_id, err);
            return HttpResponse::InternalServerError().json(json!({
                "error": "Error fetching film metadata"
            }));
        }
    }

    let content = match objects.get_object(&key).await {
        Ok(content) => content,
        Err(StoreError::NotFound) => {
            return HttpResponse::NotFound().json(json!({
                "error": "Requested file not found"
            }));
        }
        Err(err) => {
            tracing::error!("Failed to read {}: {}", key, err);
            return HttpResponse::InternalServerError().json(json!({
                "error": "Error fetching file from storage"
            }));
        }
    };

    let record = DownloadRecord {
        user_id: principal.user_id.clone(),
        film_id: film_id.clone(),
        downloaded_at: Utc::now(),
    };
    if let Err(err) = downloads.record(&record).await {
        tracing::error!("Failed to record download: {}", err);
        return HttpResponse::InternalServerError().json(json!({
            "error": "Error recording download"
        }));
    }

    tracing::info!(user = %principal.user_id, %key, "Film downloaded");
    HttpResponse::Ok().json(json!({
        "data": {
            "film_id": film_id,
            "key": key,
            "file": encode_file(&content)
        }
    }))
}
