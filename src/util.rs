use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::env;
use validator::ValidationErrors;

#[derive(Serialize, Deserialize, Debug)]
pub struct ResponseMessage {
    pub message: String,
}

impl ResponseMessage {
    pub fn new(message: impl Into<String>) -> Self {
        ResponseMessage {
            message: message.into(),
        }
    }
}

const REQUIRED_ENV: &[&str] = &["APP_AUTH__JWT_SECRET"];

pub fn check_for_necessary_env() -> std::io::Result<()> {
    for key in REQUIRED_ENV {
        if env::var(key).is_err() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} must be set", key),
            ));
        }
    }
    Ok(())
}

/// Turns the first validation message into a 400 response.
pub fn validation_error_response(error: ValidationErrors) -> HttpResponse {
    let source = error.field_errors();
    for (_, errors) in source.iter() {
        for err in errors.iter() {
            if let Some(message) = err.message.as_ref() {
                tracing::error!("Error: {}", message.as_ref());
                return HttpResponse::BadRequest().json(json!({
                    "error": message.as_ref()
                }));
            }
        }
    }
    HttpResponse::BadRequest().json(json!({
        "error": "Invalid request"
    }))
}
