use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use r2d2::Pool;

pub mod actor;
pub mod genre;
pub mod hall;
pub mod movie;
pub mod order;
pub mod pagination;
pub mod schema;
pub mod session;
pub mod ticket;
pub mod user;

pub type DbConnection = PooledConnection<ConnectionManager<PgConnection>>;
pub type DbConnectionPool = Pool<ConnectionManager<PgConnection>>;

/// Sorted ids without duplicates, for `IN` lists and join rows.
pub fn distinct_ids(ids: &[i32]) -> Vec<i32> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}
