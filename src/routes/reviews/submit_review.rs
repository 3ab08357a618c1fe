use actix_web::{
    web::{Data, Json},
    HttpRequest, HttpResponse,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::middleware::request_principal;
use crate::models::{Rating, Review};
use crate::store::{FilmRepository, ReviewRepository};

#[derive(Deserialize, Debug)]
pub struct ReviewRequest {
    pub user_id: Option<String>,
    pub film_id: Option<String>,
    pub rating_type: Option<String>,
    pub rating: Option<Value>,
    #[serde(default)]
    pub comment: String,
}

pub async fn submit_review(
    req: HttpRequest,
    body: Json<ReviewRequest>,
    films: Data<dyn FilmRepository>,
    reviews: Data<dyn ReviewRepository>,
) -> HttpResponse {
    let body = body.into_inner();
    let user_id = body
        .user_id
        .filter(|id| !id.is_empty())
        .or_else(|| request_principal(&req).map(|principal| principal.user_id.clone()));
    let (user_id, film_id, rating_type, rating) =
        match (user_id, body.film_id, body.rating_type, body.rating) {
            (Some(user_id), Some(film_id), Some(rating_type), Some(rating)) => {
                (user_id, film_id, rating_type, rating)
            }
            _ => {
                return HttpResponse::BadRequest().json(json!({
                    "error": "Missing required fields"
                }));
            }
        };

    let rating = match Rating::parse(&rating_type, &rating) {
        Ok(rating) => rating,
        Err(err) => {
            tracing::info!("Rejected rating: {}", err);
            return HttpResponse::BadRequest().json(json!({
                "error": err.to_string()
            }));
        }
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
                "error": "Failed to submit review"
            }));
        }
    }

    let review = Review {
        review_id: Uuid::new_v4(),
        user_id,
        film_id,
        rating,
        comment: body.comment,
        timestamp: Utc::now().timestamp(),
    };
    match reviews.put(&review).await {
        Ok(()) => {
            tracing::info!(review_id = %review.review_id, "Review submitted");
            HttpResponse::Ok().json(json!({
                "message": "Review submitted successfully",
                "data": review
            }))
        }
        Err(err) => {
            tracing::error!("Failed to save review {}", err);
            HttpResponse::InternalServerError().json(json!({
                "error": "Failed to submit review"
            }))
        }
    }
}
