use actix_web::{web, HttpResponse, Scope};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use super::{
    create_film, delete_film, download_film, get_film_by_id, get_films, get_upload_url,
    search_films, update_film,
};
use crate::middleware::Authorization;
use crate::models::{Film, Group};
use crate::services::auth::TokenService;
use crate::store::{FilmRepository, ObjectStore};

const READERS: &[Group] = &[Group::User, Group::Admin];
const EDITORS: &[Group] = &[Group::Admin];

pub fn films_source(tokens: &Arc<TokenService>) -> Scope {
    let readers = || Authorization::new(tokens.clone(), READERS);
    let editors = || Authorization::new(tokens.clone(), EDITORS);
    web::scope("/films")
        .route("", web::post().to(create_film).wrap(editors()))
        .route("", web::get().to(get_films).wrap(readers()))
        .route("/search", web::get().to(search_films).wrap(readers()))
        .route("/upload-url", web::get().to(get_upload_url).wrap(editors()))
        .route("/{film_id}", web::get().to(get_film_by_id).wrap(readers()))
        .route("/{film_id}", web::put().to(update_film).wrap(editors()))
        .route("/{film_id}", web::delete().to(delete_film).wrap(editors()))
        .route(
            "/{film_id}/download",
            web::get().to(download_film).wrap(readers()),
        )
}

#[derive(Serialize)]
pub struct FilmWithFile {
    #[serde(flatten)]
    pub film: Film,
    pub file: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum FileError {
    InvalidBase64,
    Empty,
}

impl FileError {
    pub fn message(&self) -> &'static str {
        match self {
            FileError::InvalidBase64 => "Invalid base64 file content",
            FileError::Empty => "Decoded file content is empty",
        }
    }
}

pub fn decode_file(file_base64: &str) -> Result<Vec<u8>, FileError> {
    let content = STANDARD
        .decode(file_base64.trim())
        .map_err(|_| FileError::InvalidBase64)?;
    if content.is_empty() {
        return Err(FileError::Empty);
    }
    Ok(content)
}

pub fn encode_file(content: &[u8]) -> String {
    STANDARD.encode(content)
}

/// Metadata of one film with its content inlined as base64.
pub async fn film_with_file(
    film_id: &str,
    films: &dyn FilmRepository,
    objects: &dyn ObjectStore,
) -> HttpResponse {
    let film = match films.get(film_id).await {
        Ok(Some(film)) => film,
        Ok(None) => {
            tracing::info!("Film {} not found", film_id);
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
    };
    match objects.get_object(&Film::content_key(film_id)).await {
        Ok(content) => HttpResponse::Ok().json(json!({
            "data": FilmWithFile {
                film,
                file: encode_file(&content),
            }
        })),
        Err(err) => {
            tracing::error!("Failed to read content of film {}: {}", film_id, err);
            HttpResponse::InternalServerError().json(json!({
                "error": "Error fetching file from storage"
            }))
        }
    }
}

pub fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).map_or(true, str::is_empty)
}
