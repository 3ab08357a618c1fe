use actix_web::{
    web::{Data, Json},
    HttpRequest, HttpResponse,
};
use serde_json::json;

use super::util::SubscriptionRequest;
use crate::store::SubscriptionRepository;
use crate::util::ResponseMessage;

pub async fn create_subscription(
    req: HttpRequest,
    body: Json<SubscriptionRequest>,
    subscriptions: Data<dyn SubscriptionRepository>,
) -> HttpResponse {
    let subscription = match body.into_inner().into_subscription(&req) {
        Ok(subscription) => subscription,
        Err(response) => return response,
    };
    match subscriptions.put(&subscription).await {
        Ok(()) => {
            tracing::info!(?subscription, "Subscription added");
            HttpResponse::Ok().json(ResponseMessage::new("Subscription added successfully"))
        }
        Err(err) => {
            tracing::error!("Failed to save subscription {}", err);
            HttpResponse::InternalServerError().json(json!({
                "error": "Failed to save subscription"
            }))
        }
    }
}
