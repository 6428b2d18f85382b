use diesel::pg::Pg;
use diesel::prelude::*;
use log::debug;

use crate::core::error::Error;
use crate::core::genre::{Genre, GenreChangeset, NewGenre};
use crate::db::DbConnection;
use crate::db::schema::genres;

pub fn find_genres(conn: &DbConnection) -> Result<Vec<Genre>, Error> {
    genres::table
        .order(genres::id.asc())
        .load(conn)
        .map_err(Error::from)
}

pub fn find_one_genre(conn: &DbConnection, genre_id: i32) -> Result<Option<Genre>, Error> {
    genres::table
        .find(genre_id)
        .first(conn)
        .optional()
        .map_err(Error::from)
}

/// The subset of `genre_ids` that exist.
pub fn find_genre_ids(conn: &DbConnection, genre_ids: &[i32]) -> Result<Vec<i32>, Error> {
    genres::table
        .filter(genres::id.eq_any(genre_ids))
        .select(genres::id)
        .load(conn)
        .map_err(Error::from)
}

pub fn create_genre(conn: &DbConnection, genre: NewGenre) -> Result<Genre, Error> {
    let query = diesel::insert_into(genres::table)
        .values(&genre);

    debug!("{}", diesel::debug_query::<Pg, _>(&query));

    query
        .get_result(conn)
        .map_err(Error::from)
}

pub fn update_genre(conn: &DbConnection, genre_id: i32, genre: GenreChangeset) -> Result<Option<Genre>, Error> {
    if genre.is_empty() {
        return find_one_genre(conn, genre_id)
    }

    let query = diesel::update(genres::table.find(genre_id))
        .set(&genre);

    debug!("{}", diesel::debug_query::<Pg, _>(&query));

    query
        .get_result(conn)
        .optional()
        .map_err(Error::from)
}

pub fn delete_genre(conn: &DbConnection, genre_id: i32) -> Result<bool, Error> {
    let query = diesel::delete(genres::table.find(genre_id));

    debug!("{}", diesel::debug_query::<Pg, _>(&query));

    query
        .execute(conn)
        .map_err(Error::from)
        .map(|r| r > 0)
}
