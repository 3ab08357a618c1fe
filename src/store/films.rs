use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::Instrument;

use crate::error::{StoreError, StoreResult};
use crate::models::{Film, FilmChanges, FilmFilter};

#[async_trait]
pub trait FilmRepository: Send + Sync {
    /// Inserts the film, replacing any record with the same id.
    /// Returns `true` when no film with that id existed before.
    async fn put(&self, film: &Film) -> StoreResult<bool>;

    async fn get(&self, film_id: &str) -> StoreResult<Option<Film>>;

    /// Applies a partial update and returns the stored film.
    /// Fails with `NotFound` when the film does not exist.
    async fn update(&self, film_id: &str, changes: &FilmChanges) -> StoreResult<Film>;

    /// Fails with `NotFound` when the film does not exist.
    async fn delete(&self, film_id: &str) -> StoreResult<()>;

    async fn list(&self) -> StoreResult<Vec<Film>>;

    async fn search(&self, filter: &FilmFilter) -> StoreResult<Vec<Film>>;
}

const FILM_COLUMNS: &str = "film_id, title, director, year, actors, genre, description";

pub struct PgFilmRepository {
    pool: PgPool,
}

impl PgFilmRepository {
    pub fn new(pool: PgPool) -> Self {
        PgFilmRepository { pool }
    }
}

#[async_trait]
impl FilmRepository for PgFilmRepository {
    async fn put(&self, film: &Film) -> StoreResult<bool> {
        let query_span = tracing::info_span!("Saving film metadata", film_id = %film.film_id);
        let row = sqlx::query(
            r#"
                INSERT INTO films (film_id, title, director, year, actors, genre, description)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ON CONFLICT (film_id) DO UPDATE SET
                    title = EXCLUDED.title,
                    director = EXCLUDED.director,
                    year = EXCLUDED.year,
                    actors = EXCLUDED.actors,
                    genre = EXCLUDED.genre,
                    description = EXCLUDED.description
                RETURNING (xmax = 0) AS inserted
            "#,
        )
        .bind(&film.film_id)
        .bind(&film.title)
        .bind(&film.director)
        .bind(film.year)
        .bind(&film.actors)
        .bind(&film.genre)
        .bind(&film.description)
        .fetch_one(&self.pool)
        .instrument(query_span)
        .await?;
        Ok(row.try_get::<bool, _>("inserted")?)
    }

    async fn get(&self, film_id: &str) -> StoreResult<Option<Film>> {
        let query_span = tracing::info_span!("Fetching film metadata", %film_id);
        let film = sqlx::query_as::<_, Film>(&format!(
            "SELECT {} FROM films WHERE film_id = $1",
            FILM_COLUMNS
        ))
        .bind(film_id)
        .fetch_optional(&self.pool)
        .instrument(query_span)
        .await?;
        Ok(film)
    }

    async fn update(&self, film_id: &str, changes: &FilmChanges) -> StoreResult<Film> {
        let query_span = tracing::info_span!("Updating film metadata", %film_id);
        let film = sqlx::query_as::<_, Film>(&format!(
            r#"
                UPDATE films SET
                    title = COALESCE($2, title),
                    director = COALESCE($3, director),
                    year = COALESCE($4, year),
                    actors = COALESCE($5, actors),
                    description = COALESCE($6, description),
                    genre = COALESCE($7, genre)
                WHERE film_id = $1
                RETURNING {}
            "#,
            FILM_COLUMNS
        ))
        .bind(film_id)
        .bind(&changes.title)
        .bind(&changes.director)
        .bind(changes.year)
        .bind(&changes.actors)
        .bind(&changes.description)
        .bind(&changes.genre)
        .fetch_optional(&self.pool)
        .instrument(query_span)
        .await?;
        film.ok_or(StoreError::NotFound)
    }

    async fn delete(&self, film_id: &str) -> StoreResult<()> {
        let query_span = tracing::info_span!("Deleting film metadata", %film_id);
        let result = sqlx::query("DELETE FROM films WHERE film_id = $1")
            .bind(film_id)
            .execute(&self.pool)
            .instrument(query_span)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list(&self) -> StoreResult<Vec<Film>> {
        let query_span = tracing::info_span!("Listing film catalog");
        let films = sqlx::query_as::<_, Film>(&format!(
            "SELECT {} FROM films ORDER BY film_id",
            FILM_COLUMNS
        ))
        .fetch_all(&self.pool)
        .instrument(query_span)
        .await?;
        Ok(films)
    }

    async fn search(&self, filter: &FilmFilter) -> StoreResult<Vec<Film>> {
        let query_span = tracing::info_span!("Searching film catalog", ?filter);
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM films WHERE TRUE", FILM_COLUMNS));
        for (column, needle) in [
            ("title", &filter.title),
            ("description", &filter.description),
            ("director", &filter.director),
            ("genre", &filter.genre),
        ] {
            if let Some(needle) = needle {
                builder
                    .push(format!(" AND strpos({}, ", column))
                    .push_bind(needle.clone())
                    .push(") > 0");
            }
        }
        if let Some(actor) = &filter.actors {
            builder
                .push(" AND ")
                .push_bind(actor.clone())
                .push(" = ANY(actors)");
        }
        builder.push(" ORDER BY film_id");
        let films = builder
            .build_query_as::<Film>()
            .fetch_all(&self.pool)
            .instrument(query_span)
            .await?;
        Ok(films)
    }
}
