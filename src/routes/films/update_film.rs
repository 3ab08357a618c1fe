use actix_web::{
    web::{Data, Json, Path},
    HttpResponse,
};
use serde::Deserialize;
use serde_json::json;

use super::util::decode_file;
use crate::error::StoreError;
use crate::models::{Film, FilmChanges};
use crate::store::{FilmRepository, ObjectStore};

#[derive(Deserialize, Debug)]
pub struct UpdateFilmRequest {
    #[serde(flatten)]
    pub changes: FilmChanges,
    pub file: Option<String>,
}

pub async fn update_film(
    film_id: Path<String>,
    body: Json<UpdateFilmRequest>,
    films: Data<dyn FilmRepository>,
    objects: Data<dyn ObjectStore>,
) -> HttpResponse {
    let film_id = film_id.into_inner();
    let UpdateFilmRequest { changes, file } = body.into_inner();
    if changes.is_empty() && file.is_none() {
        tracing::error!("Missing required fields");
        return HttpResponse::BadRequest().json(json!({
            "error": "Missing required fields"
        }));
    }
    let content = match file.as_deref().map(decode_file).transpose() {
        Ok(content) => content,
        Err(err) => {
            tracing::error!("Rejected film content: {}", err.message());
            return HttpResponse::BadRequest().json(json!({
                "error": err.message()
            }));
        }
    };

    let updated = if changes.is_empty() {
        films.get(&film_id).await.and_then(|film| film.ok_or(StoreError::NotFound))
    } else {
        films.update(&film_id, &changes).await
    };
    let film = match updated {
        Ok(film) => film,
        Err(StoreError::NotFound) => {
            tracing::info!("Film {} not found", film_id);
            return HttpResponse::NotFound().json(json!({
                "error": "Film not found"
            }));
        }
        Err(err) => {
            tracing::error!("Error updating film with ID {}: {}", film_id, err);
            return HttpResponse::InternalServerError().json(json!({
                "error": "Error updating film"
            }));
        }
    };

    if let Some(content) = content {
        if let Err(err) = objects
            .put_object(
                &Film::content_key(&film_id),
                content,
                mime::APPLICATION_OCTET_STREAM.as_ref(),
            )
            .await
        {
            tracing::error!("Error updating file for film ID {}: {}", film_id, err);
            return HttpResponse::InternalServerError().json(json!({
                "error": "Error updating file in storage"
            }));
        }
    }

    tracing::info!("Film with ID {} updated successfully", film_id);
    HttpResponse::Ok().json(json!({
        "message": "Film updated successfully",
        "data": film
    }))
}
