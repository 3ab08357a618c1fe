use actix_web::{
    http::header,
    web::{Data, Json},
    HttpRequest, HttpResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use super::util::{
    validate_birth_date, validate_name, validate_password, validate_user_name, DATE_FORMAT,
};
use crate::configuration::Settings;
use crate::error::StoreError;
use crate::models::{Group, NewUser, DEFAULT_ROLE};
use crate::services::auth::{hash_password, TokenService};
use crate::store::UserRepository;
use crate::util::validation_error_response;

#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(custom(function = "validate_user_name"))]
    pub username: String,
    #[validate(custom(function = "validate_password"))]
    pub password: String,
    #[validate(email(message = "Not a valid email"))]
    pub email: String,
    #[validate(custom(function = "validate_name"))]
    pub first_name: String,
    #[validate(custom(function = "validate_name"))]
    pub last_name: String,
    #[validate(custom(function = "validate_birth_date"))]
    pub date_of_birth: String,
    pub group: Option<String>,
}

fn caller_is_admin(req: &HttpRequest, tokens: &TokenService) -> bool {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| tokens.verify_bearer(value).ok())
        .map_or(false, |claims| {
            claims.is_access_token() && Group::Admin.is_member(&claims.groups)
        })
}

/// Creates a confirmed account and adds it to the requested group
/// (`User` by default). The role attribute mirrors the group.
/// Other groups need an admin caller unless registration is open.
pub async fn register(
    req: HttpRequest,
    body: Json<RegisterRequest>,
    users: Data<dyn UserRepository>,
    tokens: Data<TokenService>,
    settings: Data<Settings>,
) -> HttpResponse {
    tracing::info!("Registration request for {}", body.username);
    if let Err(error) = body.validate() {
        return validation_error_response(error);
    }
    let date_of_birth = match NaiveDate::parse_from_str(&body.date_of_birth, DATE_FORMAT) {
        Ok(date) => date,
        Err(_) => {
            return HttpResponse::BadRequest().json(json!({
                "error": "dateOfBirth must be a date formatted as YYYY-MM-DD"
            }));
        }
    };

    let requested_group = body.group.as_deref().unwrap_or(DEFAULT_ROLE);
    let group = match users.find_group(requested_group).await {
        Ok(Some(group)) => group,
        Ok(None) => {
            tracing::error!("Group {} does not exist", requested_group);
            return HttpResponse::BadRequest().json(json!({
                "error": format!("Group {} does not exist", requested_group)
            }));
        }
        Err(err) => {
            tracing::error!("Failed to look up group {}", err);
            return HttpResponse::InternalServerError().json(json!({
                "error": "Failed to create user"
            }));
        }
    };

    if !group.name.eq_ignore_ascii_case(DEFAULT_ROLE)
        && !settings.auth.open_group_registration
        && !caller_is_admin(&req, &tokens)
    {
        tracing::error!("Refused self-registration into group {}", group.name);
        return HttpResponse::Forbidden().json(json!({
            "error": format!("Only administrators can register users into group {}", group.name)
        }));
    }

    let password_hash = match hash_password(&body.password) {
        Ok(hash) => {
            tracing::info!("Password hashed successfully");
            hash
        }
        Err(err) => {
            tracing::error!("Failed to hash password {}", err);
            return HttpResponse::InternalServerError().json(json!({
                "error": "Failed to create user"
            }));
        }
    };

    let new_user = NewUser {
        username: body.username.clone(),
        email: body.email.clone(),
        password_hash,
        first_name: body.first_name.clone(),
        last_name: body.last_name.clone(),
        date_of_birth,
        role: group.name.clone(),
    };
    let user = match users.create(&new_user).await {
        Ok(user) => user,
        Err(StoreError::Conflict) => {
            tracing::error!("Username or email already exists");
            return HttpResponse::BadRequest().json(json!({
                "error": "Username or email already exists"
            }));
        }
        Err(err) => {
            tracing::error!("Failed to create user {}", err);
            return HttpResponse::InternalServerError().json(json!({
                "error": "Failed to create user"
            }));
        }
    };

    if let Err(err) = users.add_to_group(user.id, &group.name).await {
        tracing::error!("Failed to add user {} to group {}: {}", user.id, group.name, err);
        return HttpResponse::InternalServerError().json(json!({
            "error": "Failed to add user to group"
        }));
    }

    tracing::info!("User created successfully");
    HttpResponse::Ok().json(json!({
        "message": "User registered successfully",
        "data": {
            "user_id": user.id,
            "username": user.username,
            "group": group.name,
            "user_confirmed": user.confirmed
        }
    }))
}
