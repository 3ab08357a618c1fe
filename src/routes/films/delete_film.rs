use actix_web::{
    web::{Data, Path},
    HttpResponse,
};
use serde_json::json;

use crate::configuration::Settings;
use crate::error::StoreError;
use crate::models::Film;
use crate::store::{FilmRepository, ObjectStore};
use crate::util::ResponseMessage;

pub async fn delete_film(
    film_id: Path<String>,
    films: Data<dyn FilmRepository>,
    objects: Data<dyn ObjectStore>,
    settings: Data<Settings>,
) -> HttpResponse {
    let film_id = film_id.into_inner();
    match films.delete(&film_id).await {
        Ok(()) => tracing::info!("Deleted metadata of film {}", film_id),
        Err(StoreError::NotFound) => {
            return HttpResponse::NotFound().json(json!({
                "error": "Film not found"
            }));
        }
        Err(err) => {
            tracing::error!("Error deleting metadata of film {}: {}", film_id, err);
            return HttpResponse::InternalServerError().json(json!({
                "error": "Error deleting film metadata"
            }));
        }
    }

    if let Err(err) = objects.delete_object(&Film::content_key(&film_id)).await {
        tracing::error!("Error deleting content of film {}: {}", film_id, err);
        return HttpResponse::InternalServerError().json(json!({
            "error": "Error deleting file from storage"
        }));
    }

    for resolution in &settings.transcoding.default_resolutions {
        let key = Film::variant_key(&film_id, resolution);
        if let Err(err) = objects.delete_object(&key).await {
            tracing::warn!("Could not delete variant {}: {}", key, err);
        }
    }

    HttpResponse::Ok().json(ResponseMessage::new("Film deleted successfully"))
}
