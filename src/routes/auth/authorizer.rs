use actix_web::{
    web::{self, Data, Json},
    HttpResponse, Scope,
};
use serde::Deserialize;

use crate::models::Group;
use crate::services::auth::{evaluate_policy, TokenService};

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerRequest {
    #[serde(default)]
    pub authorization_token: String,
    #[serde(default)]
    pub method_arn: String,
}

fn authorize(body: &AuthorizerRequest, tokens: &TokenService, group: Group) -> HttpResponse {
    let response = evaluate_policy(tokens, &body.authorization_token, &body.method_arn, group);
    HttpResponse::Ok().json(response)
}

pub async fn authorize_user(body: Json<AuthorizerRequest>, tokens: Data<TokenService>) -> HttpResponse {
    authorize(&body, &tokens, Group::User)
}

pub async fn authorize_admin(body: Json<AuthorizerRequest>, tokens: Data<TokenService>) -> HttpResponse {
    authorize(&body, &tokens, Group::Admin)
}

/// Gateway-compatible policy endpoints, one per required group.
pub fn authorizer_source() -> Scope {
    web::scope("/authorizer")
        .route("/user", web::post().to(authorize_user))
        .route("/admin", web::post().to(authorize_admin))
}
