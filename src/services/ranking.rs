use crate::models::{
    DownloadRecord, Film, LikeDislike, Rating, Review, Subscription, SubscriptionType, Thumbs,
    UserFeedEntry,
};

const SUBSCRIPTION_WEIGHT: u32 = 5;
const POSITIVE_VOTE_WEIGHT: u32 = 5;
const DOWNLOAD_WEIGHT: u32 = 3;
const NUMERIC_MULTIPLIER: u32 = 2;
const NUMERIC_THRESHOLD: u8 = 2;

fn rating_points(rating: &Rating) -> u32 {
    match rating {
        Rating::Numeric(value) if *value > NUMERIC_THRESHOLD => u32::from(*value) * NUMERIC_MULTIPLIER,
        Rating::LikeDislike(LikeDislike::Like) | Rating::Thumbs(Thumbs::Up) => POSITIVE_VOTE_WEIGHT,
        _ => 0,
    }
}

fn subscription_points(subscription: &Subscription, film: &Film) -> u32 {
    let value = subscription.subscription_value.as_str();
    let matched = match subscription.subscription_type {
        SubscriptionType::Genre => film.genre.contains(value),
        SubscriptionType::Director => film.director == value,
        SubscriptionType::Actor => film.actors.iter().any(|actor| actor == value),
    };
    if matched {
        SUBSCRIPTION_WEIGHT
    } else {
        0
    }
}

/// Interest of one user in one film.
pub fn score_film(
    film: &Film,
    reviews: &[Review],
    subscriptions: &[Subscription],
    downloads: &[DownloadRecord],
) -> u32 {
    let from_reviews: u32 = reviews
        .iter()
        .filter(|review| review.film_id == film.film_id)
        .map(|review| rating_points(&review.rating))
        .sum();
    let from_subscriptions: u32 = subscriptions
        .iter()
        .map(|subscription| subscription_points(subscription, film))
        .sum();
    let from_downloads = downloads
        .iter()
        .filter(|download| download.film_id == film.film_id)
        .count() as u32
        * DOWNLOAD_WEIGHT;
    from_reviews + from_subscriptions + from_downloads
}

/// Scores the catalog for `user_id` and keeps the best `limit` films.
/// Zero scores are dropped; equal scores keep catalog order.
pub fn rank_feed(
    user_id: &str,
    films: &[Film],
    reviews: &[Review],
    subscriptions: &[Subscription],
    downloads: &[DownloadRecord],
    limit: usize,
) -> Vec<UserFeedEntry> {
    let mut scored: Vec<(&Film, u32)> = films
        .iter()
        .map(|film| (film, score_film(film, reviews, subscriptions, downloads)))
        .filter(|(_, score)| *score > 0)
        .collect();
    // sort_by is stable
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored
        .into_iter()
        .take(limit)
        .map(|(film, score)| UserFeedEntry::new(user_id, film, score))
        .collect()
}
