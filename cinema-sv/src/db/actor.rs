use diesel::pg::Pg;
use diesel::prelude::*;
use log::debug;

use crate::core::actor::{Actor, ActorChangeset, NewActor};
use crate::core::error::Error;
use crate::db::DbConnection;
use crate::db::schema::actors;

pub fn find_actors(conn: &DbConnection) -> Result<Vec<Actor>, Error> {
    actors::table
        .order(actors::id.asc())
        .load(conn)
        .map_err(Error::from)
}

pub fn find_one_actor(conn: &DbConnection, actor_id: i32) -> Result<Option<Actor>, Error> {
    actors::table
        .find(actor_id)
        .first(conn)
        .optional()
        .map_err(Error::from)
}

/// The subset of `actor_ids` that exist.
pub fn find_actor_ids(conn: &DbConnection, actor_ids: &[i32]) -> Result<Vec<i32>, Error> {
    actors::table
        .filter(actors::id.eq_any(actor_ids))
        .select(actors::id)
        .load(conn)
        .map_err(Error::from)
}

pub fn create_actor(conn: &DbConnection, actor: NewActor) -> Result<Actor, Error> {
    let query = diesel::insert_into(actors::table)
        .values(&actor);

    debug!("{}", diesel::debug_query::<Pg, _>(&query));

    query
        .get_result(conn)
        .map_err(Error::from)
}

pub fn update_actor(conn: &DbConnection, actor_id: i32, actor: ActorChangeset) -> Result<Option<Actor>, Error> {
    if actor.is_empty() {
        return find_one_actor(conn, actor_id)
    }

    let query = diesel::update(actors::table.find(actor_id))
        .set(&actor);

    debug!("{}", diesel::debug_query::<Pg, _>(&query));

    query
        .get_result(conn)
        .optional()
        .map_err(Error::from)
}

pub fn delete_actor(conn: &DbConnection, actor_id: i32) -> Result<bool, Error> {
    let query = diesel::delete(actors::table.find(actor_id));

    debug!("{}", diesel::debug_query::<Pg, _>(&query));

    query
        .execute(conn)
        .map_err(Error::from)
        .map(|r| r > 0)
}
