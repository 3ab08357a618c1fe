use actix_web::{
    web::{Data, Query},
    HttpResponse,
};
use serde_json::json;

use crate::models::FilmFilter;
use crate::store::FilmRepository;

pub async fn search_films(query: Query<FilmFilter>, films: Data<dyn FilmRepository>) -> HttpResponse {
    let filter = query.into_inner();
    tracing::info!("Searching films with {:?}", filter);
    match films.search(&filter).await {
        Ok(found) => {
            tracing::info!("Search matched {} films", found.len());
            HttpResponse::Ok().json(json!({ "data": found }))
        }
        Err(err) => {
            tracing::error!("Film search failed {}", err);
            HttpResponse::InternalServerError().json(json!({
                "error": "Error searching films"
            }))
        }
    }
}
