use std::collections::HashMap;

use log::{debug, info};
use uuid::Uuid;

use crate::core::actor::{Actor, ActorChangeset, ActorListView, ActorView, CreateActorParams};
use crate::core::error::Error;
use crate::core::filter::MovieFilter;
use crate::core::genre::{CreateGenreParams, Genre, GenreChangeset};
use crate::core::hall::{CinemaHall, CinemaHallChangeset, CinemaHallView, CreateCinemaHallParams};
use crate::core::movie::{
    CreateMovieParams, MovieDetailView, MovieListView, MovieUpdate, MovieView,
};
use crate::core::order::{CreateOrderParams, OrderCreatedView, OrderView};
use crate::core::session::{
    CreateMovieSessionParams, MovieSessionChangeset, MovieSessionDetailView, MovieSessionListView,
    MovieSessionView, SessionFilter,
};
use crate::core::ticket::{TicketParams, TicketView};
use crate::core::user::{RegisterUserParams, User};
use crate::core::validate::ValidationErrors;
use crate::core::{Page, PaginationParameters};
use crate::db;
use crate::db::DbConnection;

pub fn register_user(conn: &DbConnection, params: RegisterUserParams) -> Result<User, Error> {
    info!("registering user username={}", params.username);
    params.validate()?;
    db::user::create_user(conn, params.create())
}

pub fn authenticate(conn: &DbConnection, token: Uuid) -> Result<User, Error> {
    debug!("authenticating token");
    db::user::find_user_by_token(conn, token)?
        .ok_or(Error::InvalidTokenError)
}

pub fn find_genres(conn: &DbConnection) -> Result<Vec<Genre>, Error> {
    info!("finding genres");
    db::genre::find_genres(conn)
}

pub fn find_one_genre(conn: &DbConnection, id: i32) -> Result<Genre, Error> {
    info!("finding genre id={}", id);
    db::genre::find_one_genre(conn, id)?
        .ok_or(Error::NotFoundError)
}

pub fn create_genre(conn: &DbConnection, genre: CreateGenreParams) -> Result<Genre, Error> {
    info!("creating genre {:?}", genre);
    genre.validate()?;
    db::genre::create_genre(conn, genre.create())
}

pub fn update_genre(conn: &DbConnection, id: i32, genre: GenreChangeset) -> Result<Genre, Error> {
    info!("updating genre id={} {:?}", id, genre);
    db::genre::update_genre(conn, id, genre)?
        .ok_or(Error::NotFoundError)
}

pub fn delete_genre(conn: &DbConnection, id: i32) -> Result<bool, Error> {
    info!("deleting genre id={}", id);
    db::genre::delete_genre(conn, id)
}

pub fn find_actors(conn: &DbConnection) -> Result<Vec<ActorListView>, Error> {
    info!("finding actors");
    Ok(db::actor::find_actors(conn)?
        .iter()
        .map(ActorListView::from)
        .collect())
}

pub fn find_one_actor(conn: &DbConnection, id: i32) -> Result<ActorView, Error> {
    info!("finding actor id={}", id);
    db::actor::find_one_actor(conn, id)?
        .as_ref()
        .map(ActorView::from)
        .ok_or(Error::NotFoundError)
}

pub fn create_actor(conn: &DbConnection, actor: CreateActorParams) -> Result<Actor, Error> {
    info!("creating actor {:?}", actor);
    actor.validate()?;
    db::actor::create_actor(conn, actor.create())
}

pub fn update_actor(conn: &DbConnection, id: i32, actor: ActorChangeset) -> Result<ActorView, Error> {
    info!("updating actor id={} {:?}", id, actor);
    db::actor::update_actor(conn, id, actor)?
        .as_ref()
        .map(ActorView::from)
        .ok_or(Error::NotFoundError)
}

pub fn delete_actor(conn: &DbConnection, id: i32) -> Result<bool, Error> {
    info!("deleting actor id={}", id);
    db::actor::delete_actor(conn, id)
}

pub fn find_cinema_halls(conn: &DbConnection) -> Result<Vec<CinemaHallView>, Error> {
    info!("finding cinema halls");
    Ok(db::hall::find_cinema_halls(conn)?
        .iter()
        .map(CinemaHallView::from)
        .collect())
}

pub fn find_one_cinema_hall(conn: &DbConnection, id: i32) -> Result<CinemaHallView, Error> {
    info!("finding cinema hall id={}", id);
    db::hall::find_one_cinema_hall(conn, id)?
        .as_ref()
        .map(CinemaHallView::from)
        .ok_or(Error::NotFoundError)
}

pub fn create_cinema_hall(conn: &DbConnection, hall: CreateCinemaHallParams) -> Result<CinemaHallView, Error> {
    info!("creating cinema hall {:?}", hall);
    hall.validate()?;
    db::hall::create_cinema_hall(conn, hall.create())
        .map(|h| CinemaHallView::from(&h))
}

pub fn update_cinema_hall(conn: &DbConnection, id: i32, hall: CinemaHallChangeset) -> Result<CinemaHallView, Error> {
    info!("updating cinema hall id={} {:?}", id, hall);
    db::hall::update_cinema_hall(conn, id, hall)?
        .as_ref()
        .map(CinemaHallView::from)
        .ok_or(Error::NotFoundError)
}

pub fn delete_cinema_hall(conn: &DbConnection, id: i32) -> Result<bool, Error> {
    info!("deleting cinema hall id={}", id);
    db::hall::delete_cinema_hall(conn, id)
}

pub fn find_movies(conn: &DbConnection, filter: &MovieFilter) -> Result<Vec<MovieListView>, Error> {
    info!("finding movies {:?}", filter);
    Ok(db::movie::find_movies(conn, filter)?
        .iter()
        .map(MovieListView::from)
        .collect())
}

pub fn find_one_movie(conn: &DbConnection, id: i32) -> Result<MovieDetailView, Error> {
    info!("finding movie id={}", id);
    db::movie::find_one_movie(conn, id)?
        .as_ref()
        .map(MovieDetailView::from)
        .ok_or(Error::NotFoundError)
}

pub fn create_movie(conn: &DbConnection, movie: CreateMovieParams) -> Result<MovieView, Error> {
    info!("creating movie {:?}", movie);
    movie.validate()?;
    validate_movie_relations(conn, Some(movie.genres.as_slice()), Some(movie.actors.as_slice()))?;

    db::movie::create_movie(conn, movie.create(), &movie.genres, &movie.actors)
        .map(|m| MovieView::from(&m))
}

pub fn update_movie(conn: &DbConnection, id: i32, movie: MovieUpdate) -> Result<MovieView, Error> {
    info!("updating movie id={} {:?}", id, movie);
    validate_movie_relations(conn, movie.genres.as_deref(), movie.actors.as_deref())?;

    db::movie::update_movie(conn, id, movie)?
        .as_ref()
        .map(MovieView::from)
        .ok_or(Error::NotFoundError)
}

pub fn delete_movie(conn: &DbConnection, id: i32) -> Result<bool, Error> {
    info!("deleting movie id={}", id);
    db::movie::delete_movie(conn, id)
}

fn validate_movie_relations(
    conn: &DbConnection,
    genre_ids: Option<&[i32]>,
    actor_ids: Option<&[i32]>,
) -> Result<(), Error> {
    let mut errors = ValidationErrors::new();

    if let Some(ids) = genre_ids {
        errors.require_existing("genres", ids, &db::genre::find_genre_ids(conn, ids)?);
    }
    if let Some(ids) = actor_ids {
        errors.require_existing("actors", ids, &db::actor::find_actor_ids(conn, ids)?);
    }

    errors.into_result()
}

pub fn find_movie_sessions(conn: &DbConnection, filter: &SessionFilter) -> Result<Vec<MovieSessionListView>, Error> {
    info!("finding movie sessions {:?}", filter);
    Ok(db::session::find_summaries(conn, filter)?
        .iter()
        .map(MovieSessionListView::from)
        .collect())
}

pub fn find_one_movie_session(conn: &DbConnection, id: i32) -> Result<MovieSessionDetailView, Error> {
    info!("finding movie session id={}", id);
    db::session::find_details_by_id(conn, vec![id])?
        .remove(&id)
        .ok_or(Error::NotFoundError)
}

pub fn create_movie_session(conn: &DbConnection, session: CreateMovieSessionParams) -> Result<MovieSessionView, Error> {
    info!("creating movie session {:?}", session);
    validate_session_relations(conn, Some(session.movie), Some(session.cinema_hall))?;

    db::session::create_session(conn, session.create())
        .map(|s| MovieSessionView::from(&s))
}

pub fn update_movie_session(
    conn: &DbConnection,
    id: i32,
    session: MovieSessionChangeset,
) -> Result<MovieSessionView, Error> {
    info!("updating movie session id={} {:?}", id, session);
    validate_session_relations(conn, session.movie_id, session.cinema_hall_id)?;

    db::session::update_session(conn, id, session)?
        .as_ref()
        .map(MovieSessionView::from)
        .ok_or(Error::NotFoundError)
}

pub fn delete_movie_session(conn: &DbConnection, id: i32) -> Result<bool, Error> {
    info!("deleting movie session id={}", id);
    db::session::delete_session(conn, id)
}

fn validate_session_relations(
    conn: &DbConnection,
    movie_id: Option<i32>,
    hall_id: Option<i32>,
) -> Result<(), Error> {
    let mut errors = ValidationErrors::new();

    if let Some(id) = movie_id {
        if !db::movie::movie_exists(conn, id)? {
            errors.add("movie", ValidationErrors::invalid_pk(&id.to_string()));
        }
    }
    if let Some(id) = hall_id {
        if !db::hall::cinema_hall_exists(conn, id)? {
            errors.add("cinema_hall", ValidationErrors::invalid_pk(&id.to_string()));
        }
    }

    errors.into_result()
}

pub fn find_tickets(conn: &DbConnection) -> Result<Vec<TicketView>, Error> {
    info!("finding tickets");
    db::ticket::find_tickets(conn)
}

pub fn find_one_ticket(conn: &DbConnection, id: i32) -> Result<TicketView, Error> {
    info!("finding ticket id={}", id);
    db::ticket::find_one_ticket(conn, id)?
        .ok_or(Error::NotFoundError)
}

pub fn delete_ticket(conn: &DbConnection, id: i32) -> Result<bool, Error> {
    info!("deleting ticket id={}", id);
    db::ticket::delete_ticket(conn, id)
}

pub fn find_orders(conn: &DbConnection, user: &User, pagination: &PaginationParameters) -> Result<Page<OrderView>, Error> {
    let page_number = pagination.page_number()?;
    let page_size = pagination.page_size();
    pagination.offset()?;
    info!("finding orders user={} page={} page_size={}", user.id, page_number, page_size);

    let page = db::order::find_orders(conn, user.id, page_number, page_size)?;
    if page.items.is_empty() && page_number > 1 {
        return Err(Error::InvalidPageError)
    }

    Ok(page)
}

pub fn find_one_order(conn: &DbConnection, user: &User, id: i32) -> Result<OrderView, Error> {
    info!("finding order id={} user={}", id, user.id);
    db::order::find_one_order(conn, user.id, id)?
        .ok_or(Error::NotFoundError)
}

/// Validates every ticket against its session's hall, then writes the order
/// and its tickets in one transaction. Seats already taken are not checked.
pub fn create_order(conn: &DbConnection, user: &User, order: CreateOrderParams) -> Result<OrderCreatedView, Error> {
    info!("creating order user={} {:?}", user.id, order);
    let halls: HashMap<i32, CinemaHall> = db::session::find_session_halls(conn, &order.session_ids())?;
    order.validate(&halls)?;

    let (created, created_tickets) = db::order::create_order(conn, user.id, &order.tickets)?;
    info!("created order id={} tickets={}", created.id, created_tickets.len());

    Ok(OrderCreatedView {
        id: created.id,
        tickets: created_tickets.iter().map(TicketParams::from).collect(),
    })
}

pub fn delete_order(conn: &DbConnection, user: &User, id: i32) -> Result<bool, Error> {
    info!("deleting order id={} user={}", id, user.id);
    db::order::delete_order(conn, user.id, id)
}
