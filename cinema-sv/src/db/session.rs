use std::collections::HashMap;

use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::query_builder::QueryFragment;
use diesel::query_dsl::methods::LoadQuery;
use diesel::sql_types::{Array, Date, Integer, Nullable};
use log::debug;

use crate::core::error::Error;
use crate::core::hall::{CinemaHall, CinemaHallView};
use crate::core::movie::{MovieListView, MovieWithRelations};
use crate::core::session::{
    MovieSession, MovieSessionChangeset, MovieSessionDetailView, NewMovieSession, SessionFilter, SessionSummary,
    TakenPlace,
};
use crate::db::{distinct_ids, hall, movie, DbConnection};
use crate::db::schema::{cinema_halls, movie_sessions, tickets};

/// Sessions with movie title, hall and booked ticket count. Binds:
/// `$1` session ids, `$2` UTC show date, `$3` movie id; a null bind does not filter.
const SUMMARY_SQL: &str = r#"
SELECT s.id,
       s.show_time,
       s.movie_id,
       s.cinema_hall_id,
       m.title AS movie_title,
       h.name AS cinema_hall_name,
       h.rows::bigint * h.seats_in_row AS cinema_hall_capacity,
       COUNT(t.id) AS tickets_booked
FROM movie_sessions s
JOIN movies m ON m.id = s.movie_id
JOIN cinema_halls h ON h.id = s.cinema_hall_id
LEFT JOIN tickets t ON t.movie_session_id = s.id
WHERE ($1 IS NULL OR s.id = ANY($1))
  AND ($2 IS NULL OR (s.show_time AT TIME ZONE 'UTC')::date = $2)
  AND ($3 IS NULL OR s.movie_id = $3)
GROUP BY s.id, m.title, h.name, h.rows, h.seats_in_row
ORDER BY s.show_time, s.id
"#;

pub fn find_summaries(conn: &DbConnection, filter: &SessionFilter) -> Result<Vec<SessionSummary>, Error> {
    let query = summary_query(filter);

    debug!("{}", diesel::debug_query::<Pg, _>(&query));

    query
        .load(conn)
        .map_err(Error::from)
}

fn summary_query(
    filter: &SessionFilter,
) -> impl QueryFragment<Pg> + LoadQuery<DbConnection, SessionSummary> + RunQueryDsl<DbConnection> {
    diesel::sql_query(SUMMARY_SQL)
        .bind::<Nullable<Array<Integer>>, _>(filter.ids.clone())
        .bind::<Nullable<Date>, _>(filter.date)
        .bind::<Nullable<Integer>, _>(filter.movie)
}

/// Summaries keyed by session id.
pub fn find_summaries_by_id(conn: &DbConnection, session_ids: Vec<i32>) -> Result<HashMap<i32, SessionSummary>, Error> {
    if session_ids.is_empty() {
        return Ok(HashMap::new())
    }

    let filter = SessionFilter {
        ids: Some(session_ids),
        ..SessionFilter::default()
    };

    Ok(find_summaries(conn, &filter)?
        .into_iter()
        .map(|s| (s.id, s))
        .collect())
}

pub fn find_one_session(conn: &DbConnection, session_id: i32) -> Result<Option<MovieSession>, Error> {
    movie_sessions::table
        .find(session_id)
        .first(conn)
        .optional()
        .map_err(Error::from)
}

/// The hall of each existing session among `session_ids`.
pub fn find_session_halls(conn: &DbConnection, session_ids: &[i32]) -> Result<HashMap<i32, CinemaHall>, Error> {
    let rows: Vec<(i32, CinemaHall)> = movie_sessions::table
        .inner_join(cinema_halls::table)
        .filter(movie_sessions::id.eq_any(session_ids))
        .select((movie_sessions::id, cinema_halls::all_columns))
        .load(conn)?;

    Ok(rows.into_iter().collect())
}

/// Taken `(row, seat)` places per session, ordered by row then seat.
pub fn find_taken_places(conn: &DbConnection, session_ids: &[i32]) -> Result<HashMap<i32, Vec<TakenPlace>>, Error> {
    let rows: Vec<(i32, TakenPlace)> = tickets::table
        .filter(tickets::movie_session_id.eq_any(session_ids))
        .select((tickets::movie_session_id, (tickets::row, tickets::seat)))
        .order((tickets::movie_session_id.asc(), tickets::row.asc(), tickets::seat.asc()))
        .load(conn)?;

    let mut taken: HashMap<i32, Vec<TakenPlace>> = HashMap::new();
    for (session_id, place) in rows {
        taken.entry(session_id).or_insert_with(Vec::new).push(place);
    }
    Ok(taken)
}

/// Detail views keyed by session id, with one query per related table
/// however many sessions are asked for.
pub fn find_details_by_id(
    conn: &DbConnection,
    session_ids: Vec<i32>,
) -> Result<HashMap<i32, MovieSessionDetailView>, Error> {
    let summaries = find_summaries_by_id(conn, session_ids)?;
    if summaries.is_empty() {
        return Ok(HashMap::new())
    }

    let found_ids: Vec<i32> = summaries.keys().copied().collect();
    let movie_ids: Vec<i32> = summaries.values().map(|s| s.movie_id).collect();
    let hall_ids: Vec<i32> = summaries.values().map(|s| s.cinema_hall_id).collect();

    let movies: HashMap<i32, MovieWithRelations> = movie::find_movies_by_id(conn, &distinct_ids(&movie_ids))?
        .into_iter()
        .map(|m| (m.movie.id, m))
        .collect();
    let halls: HashMap<i32, CinemaHall> = hall::find_cinema_halls_by_id(conn, &distinct_ids(&hall_ids))?
        .into_iter()
        .map(|h| (h.id, h))
        .collect();
    let mut taken = find_taken_places(conn, &found_ids)?;

    summaries.iter()
        .map(|(session_id, summary)| {
            let movie = movies.get(&summary.movie_id).ok_or(Error::NotFoundError)?;
            let hall = halls.get(&summary.cinema_hall_id).ok_or(Error::NotFoundError)?;
            let view = MovieSessionDetailView::new(
                summary,
                MovieListView::from(movie),
                CinemaHallView::from(hall),
                taken.remove(session_id).unwrap_or_default(),
            );
            Ok((*session_id, view))
        })
        .collect()
}

pub fn create_session(conn: &DbConnection, session: NewMovieSession) -> Result<MovieSession, Error> {
    let query = diesel::insert_into(movie_sessions::table)
        .values(&session);

    debug!("{}", diesel::debug_query::<Pg, _>(&query));

    query
        .get_result(conn)
        .map_err(Error::from)
}

pub fn update_session(
    conn: &DbConnection,
    session_id: i32,
    session: MovieSessionChangeset,
) -> Result<Option<MovieSession>, Error> {
    if session.is_empty() {
        return find_one_session(conn, session_id)
    }

    let query = diesel::update(movie_sessions::table.find(session_id))
        .set(&session);

    debug!("{}", diesel::debug_query::<Pg, _>(&query));

    query
        .get_result(conn)
        .optional()
        .map_err(Error::from)
}

pub fn delete_session(conn: &DbConnection, session_id: i32) -> Result<bool, Error> {
    let query = diesel::delete(movie_sessions::table.find(session_id));

    debug!("{}", diesel::debug_query::<Pg, _>(&query));

    query
        .execute(conn)
        .map_err(Error::from)
        .map(|r| r > 0)
}
