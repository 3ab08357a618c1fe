use actix_web::{
    web::{Data, Query},
    HttpRequest, HttpResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::middleware::request_principal;
use crate::store::SubscriptionRepository;

#[derive(Deserialize, Debug)]
pub struct UserQuery {
    pub user_id: Option<String>,
}

pub async fn get_subscriptions(
    req: HttpRequest,
    query: Query<UserQuery>,
    subscriptions: Data<dyn SubscriptionRepository>,
) -> HttpResponse {
    let user_id = match query.user_id.clone().filter(|id| !id.is_empty()) {
        Some(user_id) => user_id,
        None => match request_principal(&req) {
            Some(principal) => principal.user_id.clone(),
            None => {
                return HttpResponse::BadRequest().json(json!({
                    "error": "user_id is required"
                }))
            }
        },
    };
    match subscriptions.list_by_user(&user_id).await {
        Ok(list) => HttpResponse::Ok().json(json!({ "data": list })),
        Err(err) => {
            tracing::error!("Failed to list subscriptions of {}: {}", user_id, err);
            HttpResponse::InternalServerError().json(json!({
                "error": "Failed to fetch subscriptions"
            }))
        }
    }
}
