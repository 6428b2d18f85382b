use actix_web::{post, HttpResponse, web};
use actix_web::web::Json;

use crate::core::action;
use crate::core::error::Error;
use crate::core::user::RegisterUserParams;
use crate::db::{DbConnection, DbConnectionPool};

/// Registers a user and hands back the token to send as `Authorization: Token <token>`.
#[post("/users")]
pub async fn post_user(
    pool: web::Data<DbConnectionPool>,
    req: Json<RegisterUserParams>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()?;
    let params = req.into_inner();

    let user = web::block(move || action::register_user(&conn, params)).await?;

    Ok(HttpResponse::Created().json(user))
}
