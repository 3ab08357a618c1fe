use actix_web::{
    web::{Data, Json},
    HttpResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::services::auth::{verify_password, TokenService};
use crate::store::UserRepository;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub async fn login(
    body: Json<LoginRequest>,
    users: Data<dyn UserRepository>,
    tokens: Data<TokenService>,
) -> HttpResponse {
    let unauthorized = || {
        HttpResponse::Unauthorized().json(json!({
            "error": "Incorrect username or password"
        }))
    };

    let user = match users.find_by_username(&body.username).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::error!("Login attempt for unknown user {}", body.username);
            return unauthorized();
        }
        Err(err) => {
            tracing::error!("Error getting user from database {}", err);
            return HttpResponse::InternalServerError().json(json!({
                "error": "Something went wrong"
            }));
        }
    };

    if !verify_password(&body.password, &user.password_hash) {
        tracing::error!("Wrong Password");
        return unauthorized();
    }

    let groups = match users.groups_of(user.id).await {
        Ok(groups) => groups,
        Err(err) => {
            tracing::error!("Error getting groups of user {}: {}", user.id, err);
            return HttpResponse::InternalServerError().json(json!({
                "error": "Something went wrong"
            }));
        }
    };

    match tokens.issue(&user, &groups) {
        Ok(issued) => {
            tracing::info!("successful Login");
            HttpResponse::Ok().json(json!({ "data": issued }))
        }
        Err(err) => {
            tracing::error!("Error Generating token {}", err);
            HttpResponse::InternalServerError().json(json!({
                "error": "Something went wrong"
            }))
        }
    }
}
