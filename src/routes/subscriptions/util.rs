use actix_web::{web, HttpRequest, HttpResponse, Scope};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use super::{create_subscription, delete_subscription, get_subscriptions};
use crate::middleware::{request_principal, Authorization};
use crate::models::{Group, Subscription, SubscriptionType};
use crate::services::auth::TokenService;

pub fn subscriptions_source(tokens: &Arc<TokenService>) -> Scope {
    let readers = || Authorization::new(tokens.clone(), &[Group::User, Group::Admin]);
    web::scope("/subscriptions")
        .route("", web::post().to(create_subscription).wrap(readers()))
        .route("", web::get().to(get_subscriptions).wrap(readers()))
        .route("", web::delete().to(delete_subscription).wrap(readers()))
}

/// Body shared by create and delete. `user_id` defaults to the caller.
#[derive(Deserialize, Debug)]
pub struct SubscriptionRequest {
    pub user_id: Option<String>,
    pub subscription_type: Option<String>,
    pub subscription_value: Option<String>,
}

impl SubscriptionRequest {
    pub fn into_subscription(self, req: &HttpRequest) -> Result<Subscription, HttpResponse> {
        let user_id = match self.user_id.filter(|id| !id.trim().is_empty()) {
            Some(user_id) => user_id,
            None => match request_principal(req) {
                Some(principal) => principal.user_id.clone(),
                None => {
                    return Err(HttpResponse::BadRequest().json(json!({
                        "error": "user_id is required"
                    })))
                }
            },
        };
        let subscription_type = match self
            .subscription_type
            .as_deref()
            .map(str::parse::<SubscriptionType>)
        {
            Some(Ok(kind)) => kind,
            _ => {
                return Err(HttpResponse::BadRequest().json(json!({
                    "error": "subscription_type must be one of genre, director or actor"
                })))
            }
        };
        let subscription_value = match self
            .subscription_value
            .filter(|value| !value.trim().is_empty())
        {
            Some(value) => value,
            None => {
                return Err(HttpResponse::BadRequest().json(json!({
                    "error": "subscription_value is required"
                })))
            }
        };
        Ok(Subscription {
            user_id,
            subscription_type,
            subscription_value,
        })
    }
}
