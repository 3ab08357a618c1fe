mod generate_feed;
mod get_feed;

use actix_web::{web, Scope};
use std::sync::Arc;

use crate::middleware::Authorization;
use crate::models::Group;
use crate::services::auth::TokenService;

pub use generate_feed::*;
use get_feed::*;

pub fn feed_source(tokens: &Arc<TokenService>) -> Scope {
    let readers = || Authorization::new(tokens.clone(), &[Group::User, Group::Admin]);
    web::scope("/feed")
        .route("/generate", web::post().to(generate_feed).wrap(readers()))
        .route("/{user_id}", web::get().to(get_feed).wrap(readers()))
}
