use actix_web::{
    web::{Data, Query},
    HttpRequest, HttpResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::configuration::Settings;
use crate::error::StoreResult;
use crate::middleware::request_principal;
use crate::models::UserFeedEntry;
use crate::services::ranking::rank_feed;
use crate::store::{DownloadRepository, FeedRepository, FilmRepository, ReviewRepository, SubscriptionRepository};

#[derive(Deserialize, Debug)]
pub struct GenerateFeedQuery {
    pub user_id: Option<String>,
}

pub struct FeedSources<'a> {
    pub films: &'a dyn FilmRepository,
    pub reviews: &'a dyn ReviewRepository,
    pub subscriptions: &'a dyn SubscriptionRepository,
    pub downloads: &'a dyn DownloadRepository,
    pub feed: &'a dyn FeedRepository,
}

/// Scores the whole catalog for `user_id` and replaces the stored feed.
pub async fn regenerate_feed(
    sources: FeedSources<'_>,
    user_id: &str,
    size: usize,
) -> StoreResult<Vec<UserFeedEntry>> {
    let reviews = sources.reviews.list_by_user(user_id).await?;
    let subscriptions = sources.subscriptions.list_by_user(user_id).await?;
    let downloads = sources.downloads.list_by_user(user_id).await?;
    let films = sources.films.list().await?;

    let entries = rank_feed(user_id, &films, &reviews, &subscriptions, &downloads, size);
    sources.feed.replace(user_id, &entries).await?;
    Ok(entries)
}

#[allow(clippy::too_many_arguments)]
pub async fn generate_feed(
    req: HttpRequest,
    query: Query<GenerateFeedQuery>,
    films: Data<dyn FilmRepository>,
    reviews: Data<dyn ReviewRepository>,
    subscriptions: Data<dyn SubscriptionRepository>,
    downloads: Data<dyn DownloadRepository>,
    feed: Data<dyn FeedRepository>,
    settings: Data<Settings>,
) -> HttpResponse {
    let user_id = match query.user_id.clone().filter(|id| !id.is_empty()) {
        Some(user_id) => user_id,
        None => match request_principal(&req) {
            Some(principal) => principal.user_id.clone(),
            None => {
                return HttpResponse::BadRequest().json(json!({
                    "error": "user_id is required"
                }))
            }
        },
    };

    let sources = FeedSources {
        films: films.get_ref(),
        reviews: reviews.get_ref(),
        subscriptions: subscriptions.get_ref(),
        downloads: downloads.get_ref(),
        feed: feed.get_ref(),
    };
    match regenerate_feed(sources, &user_id, settings.feed.size).await {
        Ok(entries) => {
            tracing::info!(%user_id, "Feed updated with {} films", entries.len());
            HttpResponse::Ok().json(json!({
                "message": "Feed updated successfully",
                "data": entries
            }))
        }
        Err(err) => {
            tracing::error!("Failed to generate feed for {}: {}", user_id, err);
            HttpResponse::InternalServerError().json(json!({
                "error": "Failed to generate feed"
            }))
        }
    }
}
