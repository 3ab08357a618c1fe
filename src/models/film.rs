use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Film {
    pub film_id: String,
    pub title: String,
    pub director: String,
    pub year: i32,
    pub actors: Vec<String>,
    pub genre: String,
    pub description: String,
}

impl Film {
    /// Object key of the original upload.
    pub fn content_key(film_id: &str) -> String {
        film_id.to_string()
    }

    /// Object key of a transcoded variant, e.g. `film123_720p.mp4`.
    pub fn variant_key(film_id: &str, resolution: &str) -> String {
        format!("{}_{}.mp4", film_id, resolution)
    }
}

/// Fields of a partial update. `None` leaves the stored value untouched.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct FilmChanges {
    pub title: Option<String>,
    pub director: Option<String>,
    pub year: Option<i32>,
    pub actors: Option<Vec<String>>,
    pub description: Option<String>,
    pub genre: Option<String>,
}

impl FilmChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.director.is_none()
            && self.year.is_none()
            && self.actors.is_none()
            && self.description.is_none()
            && self.genre.is_none()
    }

    pub fn apply(&self, film: &mut Film) {
        if let Some(title) = &self.title {
            film.title = title.clone();
        }
        if let Some(director) = &self.director {
            film.director = director.clone();
        }
        if let Some(year) = self.year {
            film.year = year;
        }
        if let Some(actors) = &self.actors {
            film.actors = actors.clone();
        }
        if let Some(description) = &self.description {
            film.description = description.clone();
        }
        if let Some(genre) = &self.genre {
            film.genre = genre.clone();
        }
    }
}

/// Conjunctive catalog search. Text fields match by substring, `actors`
/// by membership in the actor list.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct FilmFilter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub actors: Option<String>,
    pub director: Option<String>,
    pub genre: Option<String>,
}

impl FilmFilter {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.actors.is_none()
            && self.director.is_none()
            && self.genre.is_none()
    }

    pub fn matches(&self, film: &Film) -> bool {
        let contains = |field: &str, needle: &Option<String>| match needle {
            Some(needle) => field.contains(needle.as_str()),
            None => true,
        };
        contains(&film.title, &self.title)
            && contains(&film.description, &self.description)
            && contains(&film.director, &self.director)
            && contains(&film.genre, &self.genre)
            && match &self.actors {
                Some(actor) => film.actors.iter().any(|a| a == actor),
                None => true,
            }
    }
}
