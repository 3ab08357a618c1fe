use actix_web::{
    web::{Data, Path},
    HttpResponse,
};
use serde_json::json;

use crate::store::FeedRepository;

pub async fn get_feed(user_id: Path<String>, feed: Data<dyn FeedRepository>) -> HttpResponse {
    match feed.get(&user_id).await {
        Ok(entries) => HttpResponse::Ok().json(json!({ "data": entries })),
        Err(err) => {
            tracing::error!("Failed to read feed of {}: {}", user_id, err);
            HttpResponse::InternalServerError().json(json!({
                "error": "Failed to fetch feed"
            }))
        }
    }
}
