use actix_web::{
    web::{Data, Json},
    HttpResponse,
};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use super::util::validate_user_name;
use crate::error::StoreError;
use crate::models::UserGroup;
use crate::store::UserRepository;
use crate::util::{validation_error_response, ResponseMessage};

#[derive(Deserialize, Debug, Validate)]
pub struct CreateGroupRequest {
    #[validate(custom(function = "validate_user_name"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

pub async fn create_group(body: Json<CreateGroupRequest>, users: Data<dyn UserRepository>) -> HttpResponse {
    if let Err(error) = body.validate() {
        return validation_error_response(error);
    }
    let group = UserGroup {
        name: body.name.trim().to_string(),
        description: body.description.clone(),
    };
    match users.create_group(&group).await {
        Ok(()) => {
            tracing::info!("Group {} created", group.name);
            HttpResponse::Created().json(ResponseMessage::new(format!(
                "Group {} created successfully",
                group.name
            )))
        }
        Err(StoreError::Conflict) => HttpResponse::BadRequest().json(json!({
            "error": format!("Group {} already exists", group.name)
        })),
        Err(err) => {
            tracing::error!("Failed to create group {}", err);
            HttpResponse::InternalServerError().json(json!({
                "error": "Failed to create group"
            }))
        }
    }
}
