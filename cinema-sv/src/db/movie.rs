use std::collections::HashMap;

use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Integer;
use log::debug;

use crate::core::actor::Actor;
use crate::core::error::Error;
use crate::core::filter::{contains_pattern, ActorToken, MovieFilter};
use crate::core::genre::Genre;
use crate::core::movie::{Movie, MovieActor, MovieGenre, MovieUpdate, MovieWithRelations, NewMovie};
use crate::db::{distinct_ids, DbConnection};
use crate::db::schema::{actors, genres, movie_actors, movie_genres, movies};

pub fn find_movies(conn: &DbConnection, filter: &MovieFilter) -> Result<Vec<MovieWithRelations>, Error> {
    let mut id_sets = Vec::new();
    if !filter.genres.is_empty() {
        id_sets.push(find_movie_ids_by_genres(conn, &filter.genres)?);
    }
    if !filter.actors.is_empty() {
        id_sets.push(find_movie_ids_by_actors(conn, &filter.actors)?);
    }

    let query = filtered_movies(filter.title.as_deref(), id_sets);

    debug!("{}", diesel::debug_query::<Pg, _>(&query));

    let found: Vec<Movie> = query.load(conn)?;

    with_relations(conn, found)
}

/// Movies whose title contains `title`, restricted to every one of `id_sets`.
fn filtered_movies<'a>(title: Option<&str>, id_sets: Vec<Vec<i32>>) -> movies::BoxedQuery<'a, Pg> {
    let mut query: movies::BoxedQuery<'a, Pg> = movies::table
        .order(movies::id.asc())
        .into_boxed();

    if let Some(title) = title {
        query = query.filter(movies::title.ilike(contains_pattern(title)));
    }
    for movie_ids in id_sets {
        query = query.filter(movies::id.eq_any(movie_ids));
    }

    query
}

pub fn find_movies_by_id(conn: &DbConnection, movie_ids: &[i32]) -> Result<Vec<MovieWithRelations>, Error> {
    let found: Vec<Movie> = movies::table
        .filter(movies::id.eq_any(movie_ids))
        .order(movies::id.asc())
        .load(conn)?;

    with_relations(conn, found)
}

pub fn find_one_movie(conn: &DbConnection, movie_id: i32) -> Result<Option<MovieWithRelations>, Error> {
    let found: Option<Movie> = movies::table
        .find(movie_id)
        .first(conn)
        .optional()?;

    match found {
        None => Ok(None),
        Some(movie) => Ok(with_relations(conn, vec![movie])?.pop()),
    }
}

pub fn movie_exists(conn: &DbConnection, movie_id: i32) -> Result<bool, Error> {
    diesel::select(diesel::dsl::exists(movies::table.find(movie_id)))
        .get_result(conn)
        .map_err(Error::from)
}

/// Inserts the movie and its genre and actor links in one transaction.
pub fn create_movie(
    conn: &DbConnection,
    movie: NewMovie,
    genre_ids: &[i32],
    actor_ids: &[i32],
) -> Result<MovieWithRelations, Error> {
    conn.transaction::<_, Error, _>(|| {
        let query = diesel::insert_into(movies::table)
            .values(&movie);

        debug!("{}", diesel::debug_query::<Pg, _>(&query));

        let created: Movie = query.get_result(conn)?;

        replace_genres(conn, created.id, genre_ids)?;
        replace_actors(conn, created.id, actor_ids)?;

        find_one_movie(conn, created.id)?
            .ok_or(Error::NotFoundError)
    })
}

pub fn update_movie(
    conn: &DbConnection,
    movie_id: i32,
    movie: MovieUpdate,
) -> Result<Option<MovieWithRelations>, Error> {
    conn.transaction::<_, Error, _>(|| {
        let exists = if movie.changes.is_empty() {
            movie_exists(conn, movie_id)?
        } else {
            let query = diesel::update(movies::table.find(movie_id))
                .set(&movie.changes);

            debug!("{}", diesel::debug_query::<Pg, _>(&query));

            query.get_result::<Movie>(conn).optional()?.is_some()
        };

        if !exists {
            return Ok(None)
        }

        if let Some(genre_ids) = &movie.genres {
            replace_genres(conn, movie_id, genre_ids)?;
        }
        if let Some(actor_ids) = &movie.actors {
            replace_actors(conn, movie_id, actor_ids)?;
        }

        find_one_movie(conn, movie_id)
    })
}

pub fn delete_movie(conn: &DbConnection, movie_id: i32) -> Result<bool, Error> {
    let query = diesel::delete(movies::table.find(movie_id));

    debug!("{}", diesel::debug_query::<Pg, _>(&query));

    query
        .execute(conn)
        .map_err(Error::from)
        .map(|r| r > 0)
}

fn replace_genres(conn: &DbConnection, movie_id: i32, genre_ids: &[i32]) -> Result<(), Error> {
    diesel::delete(movie_genres::table.filter(movie_genres::movie_id.eq(movie_id)))
        .execute(conn)?;

    let links: Vec<MovieGenre> = distinct_ids(genre_ids).into_iter()
        .map(|genre_id| MovieGenre { movie_id, genre_id })
        .collect();

    if !links.is_empty() {
        diesel::insert_into(movie_genres::table)
            .values(&links)
            .execute(conn)?;
    }

    Ok(())
}

fn replace_actors(conn: &DbConnection, movie_id: i32, actor_ids: &[i32]) -> Result<(), Error> {
    diesel::delete(movie_actors::table.filter(movie_actors::movie_id.eq(movie_id)))
        .execute(conn)?;

    let links: Vec<MovieActor> = distinct_ids(actor_ids).into_iter()
        .map(|actor_id| MovieActor { movie_id, actor_id })
        .collect();

    if !links.is_empty() {
        diesel::insert_into(movie_actors::table)
            .values(&links)
            .execute(conn)?;
    }

    Ok(())
}

fn find_movie_ids_by_genres(conn: &DbConnection, genre_ids: &[i32]) -> Result<Vec<i32>, Error> {
    movie_genres::table
        .filter(movie_genres::genre_id.eq_any(genre_ids))
        .select(movie_genres::movie_id)
        .distinct()
        .load(conn)
        .map_err(Error::from)
}

/// Movies having any actor that matches any token.
fn find_movie_ids_by_actors(conn: &DbConnection, tokens: &[ActorToken]) -> Result<Vec<i32>, Error> {
    let query = matching_actor_ids(tokens);

    debug!("{}", diesel::debug_query::<Pg, _>(&query));

    let actor_ids: Vec<i32> = query.load(conn)?;
    if actor_ids.is_empty() {
        return Ok(Vec::new())
    }

    movie_actors::table
        .filter(movie_actors::actor_id.eq_any(&actor_ids))
        .select(movie_actors::movie_id)
        .distinct()
        .load(conn)
        .map_err(Error::from)
}

/// Ids of actors matching a token by id or by a case-insensitive substring of
/// either name, tokens ORed together.
fn matching_actor_ids<'a>(tokens: &[ActorToken]) -> actors::BoxedQuery<'a, Pg, Integer> {
    let mut query: actors::BoxedQuery<'a, Pg, Integer> = actors::table
        .select(actors::id)
        .into_boxed();

    for token in tokens {
        query = match token {
            ActorToken::Id(actor_id) => query.or_filter(actors::id.eq(*actor_id)),
            ActorToken::Name(name) => {
                let pattern = contains_pattern(name);
                query.or_filter(actors::first_name.ilike(pattern.clone())
                    .or(actors::last_name.ilike(pattern)))
            }
        };
    }

    query
}

fn with_relations(conn: &DbConnection, found: Vec<Movie>) -> Result<Vec<MovieWithRelations>, Error> {
    if found.is_empty() {
        return Ok(Vec::new())
    }

    let movie_ids: Vec<i32> = found.iter().map(|m| m.id).collect();

    let genre_rows: Vec<(i32, Genre)> = movie_genres::table
        .inner_join(genres::table)
        .filter(movie_genres::movie_id.eq_any(&movie_ids))
        .select((movie_genres::movie_id, genres::all_columns))
        .order(genres::id.asc())
        .load(conn)?;

    let actor_rows: Vec<(i32, Actor)> = movie_actors::table
        .inner_join(actors::table)
        .filter(movie_actors::movie_id.eq_any(&movie_ids))
        .select((movie_actors::movie_id, actors::all_columns))
        .order(actors::id.asc())
        .load(conn)?;

    let mut genres_by_movie = group_by_movie(genre_rows);
    let mut actors_by_movie = group_by_movie(actor_rows);

    Ok(found.into_iter()
        .map(|movie| MovieWithRelations {
            genres: genres_by_movie.remove(&movie.id).unwrap_or_default(),
            actors: actors_by_movie.remove(&movie.id).unwrap_or_default(),
            movie,
        })
        .collect())
}

fn group_by_movie<T>(rows: Vec<(i32, T)>) -> HashMap<i32, Vec<T>> {
    let mut grouped: HashMap<i32, Vec<T>> = HashMap::new();
    for (movie_id, item) in rows {
        grouped.entry(movie_id).or_insert_with(Vec::new).push(item);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_filters_are_anded() {
        let query = filtered_movies(Some("matrix"), vec![vec![1, 2], vec![2, 3]]);
        let sql = diesel::debug_query::<Pg, _>(&query).to_string();

        assert!(sql.contains("WHERE \"movies\".\"title\" ILIKE $1 AND \"movies\".\"id\""));
        assert_eq!(sql.matches(" AND ").count(), 2);
        assert!(!sql.contains(" OR "));
        assert!(sql.contains("ORDER BY \"movies\".\"id\" ASC"));
        assert!(sql.contains("\"%matrix%\""));
    }

    #[test]
    fn no_filters_select_every_movie() {
        let query = filtered_movies(None, Vec::new());
        let sql = diesel::debug_query::<Pg, _>(&query).to_string();

        assert!(!sql.contains("WHERE"));
        assert!(sql.contains("ORDER BY \"movies\".\"id\" ASC"));
    }

    #[test]
    fn actor_tokens_are_ored_over_id_and_names() {
        let tokens = vec![ActorToken::Id(7), ActorToken::Name("reeves".to_string())];
        let sql = diesel::debug_query::<Pg, _>(&matching_actor_ids(&tokens)).to_string();

        assert!(sql.starts_with("SELECT \"actors\".\"id\" FROM \"actors\" WHERE"));
        assert!(sql.contains("\"actors\".\"id\" = $1"));
        assert!(sql.contains("\"actors\".\"first_name\" ILIKE $2"));
        assert!(sql.contains("\"actors\".\"last_name\" ILIKE $3"));
        assert_eq!(sql.matches(" OR ").count(), 2);
        assert!(!sql.contains(" AND "));
        assert!(sql.contains("\"%reeves%\""));
    }

    #[test]
    fn rows_are_grouped_in_order() {
        let grouped = group_by_movie(vec![(1, "a"), (2, "b"), (1, "c")]);
        assert_eq!(grouped[&1], vec!["a", "c"]);
        assert_eq!(grouped[&2], vec!["b"]);
        assert!(grouped.get(&3).is_none());
    }
}
