use serde::{Deserialize, Serialize};

use super::Film;

/// One ranked film of a user's feed, stored as a snapshot of the film.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct UserFeedEntry {
    pub user_id: String,
    pub film_id: String,
    pub title: String,
    pub director: String,
    pub year: i32,
    pub description: String,
    pub actors: Vec<String>,
    pub genre: String,
    pub score: i64,
}

impl UserFeedEntry {
    pub fn new(user_id: &str, film: &Film, score: u32) -> Self {
        UserFeedEntry {
            user_id: user_id.to_string(),
            film_id: film.film_id.clone(),
            title: film.title.clone(),
            director: film.director.clone(),
            year: film.year,
            description: film.description.clone(),
            actors: film.actors.clone(),
            genre: film.genre.clone(),
            score: i64::from(score),
        }
    }
}
