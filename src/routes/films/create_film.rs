use actix_web::{
    web::{Data, Json},
    HttpResponse,
};
use serde::Deserialize;
use serde_json::json;

use super::util::{decode_file, is_blank};
use crate::models::Film;
use crate::services::notifications::{FilmEvent, FilmEvents};
use crate::services::transcoding::TranscodeOrchestrator;
use crate::store::{FilmRepository, ObjectStore};
use crate::util::ResponseMessage;

#[derive(Deserialize, Debug)]
pub struct CreateFilmRequest {
    pub film_id: Option<String>,
    pub title: Option<String>,
    pub director: Option<String>,
    pub year: Option<i32>,
    #[serde(default)]
    pub actors: Vec<String>,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub description: String,
    pub file: Option<String>,
}

pub async fn create_film(
    body: Json<CreateFilmRequest>,
    films: Data<dyn FilmRepository>,
    objects: Data<dyn ObjectStore>,
    events: Data<FilmEvents>,
    transcoder: Data<TranscodeOrchestrator>,
) -> HttpResponse {
    let body = body.into_inner();
    if is_blank(&body.film_id)
        || is_blank(&body.title)
        || is_blank(&body.director)
        || body.year.is_none()
        || is_blank(&body.file)
    {
        tracing::error!("Missing required fields");
        return HttpResponse::BadRequest().json(json!({
            "error": "Missing required fields"
        }));
    }
    let content = match decode_file(body.file.as_deref().unwrap_or_default()) {
        Ok(content) => content,
        Err(err) => {
            tracing::error!("Rejected film content: {}", err.message());
            return HttpResponse::BadRequest().json(json!({
                "error": err.message()
            }));
        }
    };

    let film = Film {
        film_id: body.film_id.unwrap_or_default(),
        title: body.title.unwrap_or_default(),
        director: body.director.unwrap_or_default(),
        year: body.year.unwrap_or_default(),
        actors: body.actors,
        genre: body.genre,
        description: body.description,
    };

    let inserted = match films.put(&film).await {
        Ok(inserted) => inserted,
        Err(err) => {
            tracing::error!("Failed to save film metadata {}", err);
            return HttpResponse::InternalServerError().json(json!({
                "error": "Error saving film metadata"
            }));
        }
    };

    if let Err(err) = objects
        .put_object(
            &Film::content_key(&film.film_id),
            content,
            mime::APPLICATION_OCTET_STREAM.as_ref(),
        )
        .await
    {
        tracing::error!("Failed to upload film content {}", err);
        return HttpResponse::InternalServerError().json(json!({
            "error": "Error uploading film content"
        }));
    }
    tracing::info!("Film {} created", film.film_id);

    if transcoder.auto_transcode() {
        match transcoder.start_execution(&film.film_id, None).await {
            Ok(execution) => {
                tracing::info!(execution_id = %execution.execution_id, "Queued transcode for new film")
            }
            Err(err) => tracing::error!("Failed to queue transcode for new film: {}", err),
        }
    }
    // Subscribers hear about new films only, not about replacements.
    if inserted {
        events.publish(FilmEvent::Inserted(film));
    }

    HttpResponse::Ok().json(ResponseMessage::new("Film created successfully"))
}
