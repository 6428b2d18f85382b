use diesel::pg::Pg;
use diesel::prelude::*;
use log::debug;
use uuid::Uuid;

use crate::core::error::Error;
use crate::core::user::{NewUser, User};
use crate::db::DbConnection;
use crate::db::schema::users;

pub fn create_user(conn: &DbConnection, user: NewUser) -> Result<User, Error> {
    let query = diesel::insert_into(users::table)
        .values(&user);

    debug!("{}", diesel::debug_query::<Pg, _>(&query));

    query
        .get_result(conn)
        .map_err(Error::from)
}

pub fn find_user_by_token(conn: &DbConnection, user_token: Uuid) -> Result<Option<User>, Error> {
    users::table
        .filter(users::token.eq(user_token))
        .first(conn)
        .optional()
        .map_err(Error::from)
}
