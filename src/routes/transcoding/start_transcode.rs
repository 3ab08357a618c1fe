use actix_web::{
    web::{Data, Json, Path},
    HttpResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::services::transcoding::{TranscodeError, TranscodeOrchestrator};
use crate::store::FilmRepository;

#[derive(Deserialize, Debug, Default)]
pub struct TranscodeRequest {
    pub resolutions: Option<Vec<String>>,
}

pub async fn start_transcode(
    film_id: Path<String>,
    body: Option<Json<TranscodeRequest>>,
    films: Data<dyn FilmRepository>,
    transcoder: Data<TranscodeOrchestrator>,
) -> HttpResponse {
    let film_id = film_id.into_inner();
    let request = body.map(Json::into_inner).unwrap_or_default();

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
                "error": "Failed to start transcoding"
            }));
        }
    }

    match transcoder.start_execution(&film_id, request.resolutions).await {
        Ok(execution) => HttpResponse::Accepted().json(json!({ "data": execution })),
        Err(err @ (TranscodeError::InvalidResolution(_) | TranscodeError::NoResolutions)) => {
            HttpResponse::BadRequest().json(json!({
                "error": err.to_string()
            }))
        }
        Err(TranscodeError::QueueFull) => HttpResponse::ServiceUnavailable().json(json!({
            "error": "Transcode queue is full, try again later"
        })),
        Err(err) => {
            tracing::error!("Failed to start transcoding of {}: {}", film_id, err);
            HttpResponse::InternalServerError().json(json!({
                "error": "Failed to start transcoding"
            }))
        }
    }
}
