mod submit_review;

use actix_web::{web, Scope};
use std::sync::Arc;

use crate::middleware::Authorization;
use crate::models::Group;
use crate::services::auth::TokenService;

use submit_review::*;

pub fn reviews_source(tokens: &Arc<TokenService>) -> Scope {
    web::scope("/reviews").route(
        "",
        web::post()
            .to(submit_review)
            .wrap(Authorization::new(tokens.clone(), &[Group::User, Group::Admin])),
    )
}
