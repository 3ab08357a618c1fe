use actix_web::{
    web::{Data, Path},
    HttpResponse,
};
use serde_json::json;
use uuid::Uuid;

use crate::services::transcoding::TranscodeOrchestrator;

pub async fn get_execution(
    execution_id: Path<String>,
    transcoder: Data<TranscodeOrchestrator>,
) -> HttpResponse {
    let execution_id = match Uuid::parse_str(&execution_id) {
        Ok(id) => id,
        Err(_) => {
            return HttpResponse::NotFound().json(json!({
                "error": "Execution not found"
            }));
        }
    };
    match transcoder.describe_execution(execution_id).await {
        Some(execution) => HttpResponse::Ok().json(json!({ "data": execution })),
        None => HttpResponse::NotFound().json(json!({
            "error": "Execution not found"
        })),
    }
}
