use actix_web::{delete, get, patch, post, put, HttpResponse, web};
use actix_web::web::Json;

use crate::core::action;
use crate::core::error::Error;
use crate::core::hall::{CreateCinemaHallParams, UpdateCinemaHallParams};
use crate::db::{DbConnection, DbConnectionPool};

#[get("/cinema_halls")]
pub async fn get_cinema_halls(
    pool: web::Data<DbConnectionPool>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()?;

    let halls = web::block(move || action::find_cinema_halls(&conn)).await?;

    Ok(HttpResponse::Ok().json(halls))
}

#[post("/cinema_halls")]
pub async fn post_cinema_hall(
    pool: web::Data<DbConnectionPool>,
    req: Json<CreateCinemaHallParams>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()?;
    let params = req.into_inner();

    let hall = web::block(move || action::create_cinema_hall(&conn, params)).await?;

    Ok(HttpResponse::Created().json(hall))
}

#[get("/cinema_halls/{hall_id}")]
pub async fn get_cinema_hall(
    pool: web::Data<DbConnectionPool>,
    hall_id: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()?;
    let id = hall_id.into_inner();

    let hall = web::block(move || action::find_one_cinema_hall(&conn, id)).await?;

    Ok(HttpResponse::Ok().json(hall))
}

#[put("/cinema_halls/{hall_id}")]
pub async fn put_cinema_hall(
    pool: web::Data<DbConnectionPool>,
    hall_id: web::Path<i32>,
    req: Json<CreateCinemaHallParams>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()?;
    let id = hall_id.into_inner();
    let params = req.into_inner();

    let hall = web::block(move || {
        params.validate()?;
        action::update_cinema_hall(&conn, id, params.update())
    }).await?;

    Ok(HttpResponse::Ok().json(hall))
}

#[patch("/cinema_halls/{hall_id}")]
pub async fn patch_cinema_hall(
    pool: web::Data<DbConnectionPool>,
    hall_id: web::Path<i32>,
    req: Json<UpdateCinemaHallParams>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()?;
    let id = hall_id.into_inner();
    let params = req.into_inner();

    let hall = web::block(move || {
        params.validate()?;
        action::update_cinema_hall(&conn, id, params.update())
    }).await?;

    Ok(HttpResponse::Ok().json(hall))
}

#[delete("/cinema_halls/{hall_id}")]
pub async fn delete_cinema_hall(
    pool: web::Data<DbConnectionPool>,
    hall_id: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()?;
    let id = hall_id.into_inner();

    let was_present = web::block(move || action::delete_cinema_hall(&conn, id)).await?;

    if was_present {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(Error::NotFoundError)
    }
}
