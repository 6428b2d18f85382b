use actix_web::{delete, get, post, HttpRequest, HttpResponse, web};
use actix_web::web::Json;

use crate::api::auth::AuthToken;
use crate::api::{base_url, PageResponse};
use crate::core::action;
use crate::core::error::Error;
use crate::core::order::CreateOrderParams;
use crate::core::PaginationParameters;
use crate::db::{DbConnection, DbConnectionPool};

/// Only the caller's own orders, newest first.
#[get("/orders")]
pub async fn get_orders(
    req: HttpRequest,
    token: AuthToken,
    pool: web::Data<DbConnectionPool>,
    query: web::Query<PaginationParameters>,
) -> Result<HttpResponse, Error> {
    let params = query.into_inner();
    let page_size = params.explicit_page_size();
    let conn: DbConnection = pool.get()?;

    let page = web::block(move || {
        let user = action::authenticate(&conn, token.0)?;
        action::find_orders(&conn, &user, &params)
    }).await?;

    Ok(HttpResponse::Ok().json(PageResponse::from_page(page, page_size, base_url(&req))))
}

#[post("/orders")]
pub async fn post_order(
    token: AuthToken,
    pool: web::Data<DbConnectionPool>,
    req: Json<CreateOrderParams>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()?;
    let params = req.into_inner();

    let order = web::block(move || {
        let user = action::authenticate(&conn, token.0)?;
        action::create_order(&conn, &user, params)
    }).await?;

    Ok(HttpResponse::Created().json(order))
}

#[get("/orders/{order_id}")]
pub async fn get_order(
    token: AuthToken,
    pool: web::Data<DbConnectionPool>,
    order_id: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()?;
    let id = order_id.into_inner();

    let order = web::block(move || {
        let user = action::authenticate(&conn, token.0)?;
        action::find_one_order(&conn, &user, id)
    }).await?;

    Ok(HttpResponse::Ok().json(order))
}

#[delete("/orders/{order_id}")]
pub async fn delete_order(
    token: AuthToken,
    pool: web::Data<DbConnectionPool>,
    order_id: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()?;
    let id = order_id.into_inner();

    let was_present = web::block(move || {
        let user = action::authenticate(&conn, token.0)?;
        action::delete_order(&conn, &user, id)
    }).await?;

    if was_present {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(Error::NotFoundError)
    }
}
