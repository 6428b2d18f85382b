use actix_web::{delete, get, HttpResponse, web};

use crate::core::action;
use crate::core::error::Error;
use crate::db::{DbConnection, DbConnectionPool};

#[get("/tickets")]
pub async fn get_tickets(
    pool: web::Data<DbConnectionPool>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()?;

    let tickets = web::block(move || action::find_tickets(&conn)).await?;

    Ok(HttpResponse::Ok().json(tickets))
}

#[get("/tickets/{ticket_id}")]
pub async fn get_ticket(
    pool: web::Data<DbConnectionPool>,
    ticket_id: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()?;
    let id = ticket_id.into_inner();

    let ticket = web::block(move || action::find_one_ticket(&conn, id)).await?;

    Ok(HttpResponse::Ok().json(ticket))
}

#[delete("/tickets/{ticket_id}")]
pub async fn delete_ticket(
    pool: web::Data<DbConnectionPool>,
    ticket_id: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()?;
    let id = ticket_id.into_inner();

    let was_present = web::block(move || action::delete_ticket(&conn, id)).await?;

    if was_present {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(Error::NotFoundError)
    }
}
