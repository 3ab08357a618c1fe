use actix_web::{
    web::{Data, Query},
    HttpResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::models::DEFAULT_ROLE;
use crate::store::UserRepository;

#[derive(Deserialize, Debug)]
pub struct RoleQuery {
    pub username: Option<String>,
}

pub async fn get_user_role(query: Query<RoleQuery>, users: Data<dyn UserRepository>) -> HttpResponse {
    let username = match query.username.as_deref().filter(|name| !name.is_empty()) {
        Some(username) => username,
        None => {
            return HttpResponse::BadRequest().json(json!({
                "error": "username is required"
            }));
        }
    };
    match users.find_by_username(username).await {
        Ok(Some(user)) => {
            let role = user.role.unwrap_or_else(|| DEFAULT_ROLE.to_string());
            HttpResponse::Ok().json(json!({
                "data": {
                    "username": user.username,
                    "role": role
                }
            }))
        }
        Ok(None) => {
            tracing::info!("User {} does not exist", username);
            HttpResponse::BadRequest().json(json!({
                "error": "User does not exist."
            }))
        }
        Err(err) => {
            tracing::error!("Failed to fetch user {}", err);
            HttpResponse::BadRequest().json(json!({
                "error": "Failed to fetch user"
            }))
        }
    }
}
