use diesel::pg::Pg;
use diesel::prelude::*;
use log::debug;

use crate::core::error::Error;
use crate::core::hall::{CinemaHall, CinemaHallChangeset, NewCinemaHall};
use crate::db::DbConnection;
use crate::db::schema::cinema_halls;

pub fn find_cinema_halls(conn: &DbConnection) -> Result<Vec<CinemaHall>, Error> {
    cinema_halls::table
        .order(cinema_halls::id.asc())
        .load(conn)
        .map_err(Error::from)
}

pub fn find_one_cinema_hall(conn: &DbConnection, hall_id: i32) -> Result<Option<CinemaHall>, Error> {
    cinema_halls::table
        .find(hall_id)
        .first(conn)
        .optional()
        .map_err(Error::from)
}

pub fn find_cinema_halls_by_id(conn: &DbConnection, hall_ids: &[i32]) -> Result<Vec<CinemaHall>, Error> {
    cinema_halls::table
        .filter(cinema_halls::id.eq_any(hall_ids))
        .load(conn)
        .map_err(Error::from)
}

pub fn cinema_hall_exists(conn: &DbConnection, hall_id: i32) -> Result<bool, Error> {
    diesel::select(diesel::dsl::exists(cinema_halls::table.find(hall_id)))
        .get_result(conn)
        .map_err(Error::from)
}

pub fn create_cinema_hall(conn: &DbConnection, hall: NewCinemaHall) -> Result<CinemaHall, Error> {
    let query = diesel::insert_into(cinema_halls::table)
        .values(&hall);

    debug!("{}", diesel::debug_query::<Pg, _>(&query));

    query
        .get_result(conn)
        .map_err(Error::from)
}

pub fn update_cinema_hall(
    conn: &DbConnection,
    hall_id: i32,
    hall: CinemaHallChangeset,
) -> Result<Option<CinemaHall>, Error> {
    if hall.is_empty() {
        return find_one_cinema_hall(conn, hall_id)
    }

    let query = diesel::update(cinema_halls::table.find(hall_id))
        .set(&hall);

    debug!("{}", diesel::debug_query::<Pg, _>(&query));

    query
        .get_result(conn)
        .optional()
        .map_err(Error::from)
}

pub fn delete_cinema_hall(conn: &DbConnection, hall_id: i32) -> Result<bool, Error> {
    let query = diesel::delete(cinema_halls::table.find(hall_id));

    debug!("{}", diesel::debug_query::<Pg, _>(&query));

    query
        .execute(conn)
        .map_err(Error::from)
        .map(|r| r > 0)
}
