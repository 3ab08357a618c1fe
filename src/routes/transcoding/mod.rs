mod get_execution;
mod start_transcode;

use actix_web::{web, Scope};
use std::sync::Arc;

use crate::middleware::Authorization;
use crate::models::Group;
use crate::services::auth::TokenService;

use get_execution::*;
use start_transcode::*;

pub fn transcoding_source(tokens: &Arc<TokenService>) -> Scope {
    web::scope("/transcode")
        .route(
            "/executions/{execution_id}",
            web::get()
                .to(get_execution)
                .wrap(Authorization::new(tokens.clone(), &[Group::User, Group::Admin])),
        )
        .route(
            "/{film_id}",
            web::post()
                .to(start_transcode)
                .wrap(Authorization::new(tokens.clone(), &[Group::Admin])),
        )
}
