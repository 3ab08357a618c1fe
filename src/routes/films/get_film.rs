use actix_web::{
    web::{Data, Path, Query},
    HttpResponse,
};
use serde::Deserialize;
use serde_json::json;

use super::util::film_with_file;
use crate::store::{FilmRepository, ObjectStore};

#[derive(Deserialize, Debug)]
pub struct FilmQuery {
    pub film_id: Option<String>,
}

pub async fn get_films(
    query: Query<FilmQuery>,
    films: Data<dyn FilmRepository>,
    objects: Data<dyn ObjectStore>,
) -> HttpResponse {
    if let Some(film_id) = query.film_id.as_deref().filter(|id| !id.is_empty()) {
        return film_with_file(film_id, films.get_ref(), objects.get_ref()).await;
    }
    match films.list().await {
        Ok(list) => {
            tracing::info!("Listing {} films", list.len());
            HttpResponse::Ok().json(json!({ "data": list }))
        }
        Err(err) => {
            tracing::error!("Failed to list films {}", err);
            HttpResponse::InternalServerError().json(json!({
                "error": "Error fetching films"
            }))
        }
    }
}

pub async fn get_film_by_id(
    film_id: Path<String>,
    films: Data<dyn FilmRepository>,
    objects: Data<dyn ObjectStore>,
) -> HttpResponse {
    film_with_file(&film_id, films.get_ref(), objects.get_ref()).await
}
