use diesel::{AsChangeset, Insertable, Queryable};
use serde::{Deserialize, Serialize};

use crate::core::actor::{Actor, ActorView};
use crate::core::error::Error;
use crate::core::genre::Genre;
use crate::core::validate::ValidationErrors;
use crate::db::schema::{movie_actors, movie_genres, movies};

#[derive(Clone, Debug, PartialEq, Queryable)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub duration: i32,
}

/// A movie with its genres and actors loaded.
#[derive(Clone, Debug, PartialEq)]
pub struct MovieWithRelations {
    pub movie: Movie,
    pub genres: Vec<Genre>,
    pub actors: Vec<Actor>,
}

/// Create and update response: relations as ids.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MovieView {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub duration: i32,
    pub genres: Vec<i32>,
    pub actors: Vec<i32>,
}

impl From<&MovieWithRelations> for MovieView {
    fn from(m: &MovieWithRelations) -> Self {
        MovieView {
            id: m.movie.id,
            title: m.movie.title.clone(),
            description: m.movie.description.clone(),
            duration: m.movie.duration,
            genres: m.genres.iter().map(|g| g.id).collect(),
            actors: m.actors.iter().map(|a| a.id).collect(),
        }
    }
}

/// List response: genres by name, actors by full name.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MovieListView {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub duration: i32,
    pub genres: Vec<String>,
    pub actors: Vec<String>,
}

impl From<&MovieWithRelations> for MovieListView {
    fn from(m: &MovieWithRelations) -> Self {
        MovieListView {
            id: m.movie.id,
            title: m.movie.title.clone(),
            description: m.movie.description.clone(),
            duration: m.movie.duration,
            genres: m.genres.iter().map(|g| g.name.clone()).collect(),
            actors: m.actors.iter().map(Actor::full_name).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MovieDetailView {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub duration: i32,
    pub genres: Vec<Genre>,
    pub actors: Vec<ActorView>,
}

impl From<&MovieWithRelations> for MovieDetailView {
    fn from(m: &MovieWithRelations) -> Self {
        MovieDetailView {
            id: m.movie.id,
            title: m.movie.title.clone(),
            description: m.movie.description.clone(),
            duration: m.movie.duration,
            genres: m.genres.clone(),
            actors: m.actors.iter().map(ActorView::from).collect(),
        }
    }
}

#[derive(Clone, Debug, Insertable)]
#[table_name="movies"]
pub struct NewMovie {
    pub title: String,
    pub description: String,
    pub duration: i32,
}

#[derive(Clone, Debug, Insertable)]
#[table_name="movie_genres"]
pub struct MovieGenre {
    pub movie_id: i32,
    pub genre_id: i32,
}

#[derive(Clone, Debug, Insertable)]
#[table_name="movie_actors"]
pub struct MovieActor {
    pub movie_id: i32,
    pub actor_id: i32,
}

#[derive(Clone, Debug, Default, AsChangeset)]
#[table_name="movies"]
pub struct MovieChangeset {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: Option<i32>,
}

impl MovieChangeset {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.duration.is_none()
    }
}

/// Column changes plus replacement sets for the relations, `None` leaving them as is.
#[derive(Clone, Debug, Default)]
pub struct MovieUpdate {
    pub changes: MovieChangeset,
    pub genres: Option<Vec<i32>>,
    pub actors: Option<Vec<i32>>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CreateMovieParams {
    pub title: String,
    pub description: String,
    pub duration: i32,
    pub genres: Vec<i32>,
    pub actors: Vec<i32>,
}

impl CreateMovieParams {
    pub fn validate(&self) -> Result<(), Error> {
        let mut errors = ValidationErrors::new();
        errors.require_text("title", &self.title);
        errors.require_positive("duration", self.duration);
        errors.into_result()
    }

    pub fn create(&self) -> NewMovie {
        NewMovie {
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            duration: self.duration,
        }
    }

    pub fn update(&self) -> MovieUpdate {
        MovieUpdate {
            changes: MovieChangeset {
                title: Some(self.title.trim().to_string()),
                description: Some(self.description.clone()),
                duration: Some(self.duration),
            },
            genres: Some(self.genres.clone()),
            actors: Some(self.actors.clone()),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateMovieParams {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: Option<i32>,
    pub genres: Option<Vec<i32>>,
    pub actors: Option<Vec<i32>>,
}

impl UpdateMovieParams {
    pub fn validate(&self) -> Result<(), Error> {
        let mut errors = ValidationErrors::new();
        if let Some(title) = &self.title {
            errors.require_text("title", title);
        }
        if let Some(duration) = self.duration {
            errors.require_positive("duration", duration);
        }
        errors.into_result()
    }

    pub fn update(&self) -> MovieUpdate {
        MovieUpdate {
            changes: MovieChangeset {
                title: self.title.as_ref().map(|t| t.trim().to_string()),
                description: self.description.clone(),
                duration: self.duration,
            },
            genres: self.genres.clone(),
            actors: self.actors.clone(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use serde_json::json;

    use super::*;

    pub(crate) fn matrix() -> MovieWithRelations {
        MovieWithRelations {
            movie: Movie {
                id: 1,
                title: "The Matrix".to_string(),
                description: "Wake up, Neo.".to_string(),
                duration: 136,
            },
            genres: vec![
                Genre { id: 2, name: "Action".to_string() },
                Genre { id: 5, name: "Sci-Fi".to_string() },
            ],
            actors: vec![
                Actor { id: 3, first_name: "Keanu".to_string(), last_name: "Reeves".to_string() },
            ],
        }
    }

    #[test]
    fn list_view_flattens_relations() {
        assert_eq!(serde_json::to_value(MovieListView::from(&matrix())).unwrap(), json!({
            "id": 1,
            "title": "The Matrix",
            "description": "Wake up, Neo.",
            "duration": 136,
            "genres": ["Action", "Sci-Fi"],
            "actors": ["Keanu Reeves"],
        }));
    }

    #[test]
    fn detail_view_nests_relations() {
        assert_eq!(serde_json::to_value(MovieDetailView::from(&matrix())).unwrap(), json!({
            "id": 1,
            "title": "The Matrix",
            "description": "Wake up, Neo.",
            "duration": 136,
            "genres": [{"id": 2, "name": "Action"}, {"id": 5, "name": "Sci-Fi"}],
            "actors": [{"id": 3, "first_name": "Keanu", "last_name": "Reeves", "full_name": "Keanu Reeves"}],
        }));
    }

    #[test]
    fn write_view_uses_ids() {
        let view = MovieView::from(&matrix());
        assert_eq!(view.genres, vec![2, 5]);
        assert_eq!(view.actors, vec![3]);
    }

    #[test]
    fn full_update_replaces_relations() {
        let params = CreateMovieParams {
            title: "Heat".to_string(),
            description: "".to_string(),
            duration: 170,
            genres: vec![],
            actors: vec![4],
        };
        assert!(params.validate().is_ok());

        let update = params.update();
        assert_eq!(update.genres, Some(vec![]));
        assert_eq!(update.actors, Some(vec![4]));
        assert!(!update.changes.is_empty());
    }

    #[test]
    fn partial_update_can_touch_only_relations() {
        let params = UpdateMovieParams {
            title: None,
            description: None,
            duration: None,
            genres: Some(vec![1]),
            actors: None,
        };
        let update = params.update();
        assert!(update.changes.is_empty());
        assert_eq!(update.genres, Some(vec![1]));
        assert_eq!(update.actors, None);
    }
}
