use actix_web::{
    web::{Data, Json},
    HttpRequest, HttpResponse,
};
use serde_json::json;

use super::util::SubscriptionRequest;
use crate::error::StoreError;
use crate::store::SubscriptionRepository;
use crate::util::ResponseMessage;

pub async fn delete_subscription(
    req: HttpRequest,
    body: Json<SubscriptionRequest>,
    subscriptions: Data<dyn SubscriptionRepository>,
) -> HttpResponse {
    let subscription = match body.into_inner().into_subscription(&req) {
        Ok(subscription) => subscription,
        Err(response) => return response,
    };
    match subscriptions.delete(&subscription).await {
        Ok(()) => {
            tracing::info!(?subscription, "Subscription deleted");
            HttpResponse::Ok().json(ResponseMessage::new("Subscription deleted successfully"))
        }
        Err(StoreError::NotFound) => HttpResponse::NotFound().json(json!({
            "error": "Subscription not found"
        })),
        Err(err) => {
            tracing::error!("Failed to delete subscription {}", err);
            HttpResponse::InternalServerError().json(json!({
                "error": "Failed to delete subscription"
            }))
        }
    }
}
