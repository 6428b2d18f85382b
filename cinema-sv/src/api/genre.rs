use actix_web::{delete, get, patch, post, put, HttpResponse, web};
use actix_web::web::Json;

use crate::core::action;
use crate::core::error::Error;
use crate::core::genre::{CreateGenreParams, UpdateGenreParams};
use crate::db::{DbConnection, DbConnectionPool};

#[get("/genres")]
pub async fn get_genres(
    pool: web::Data<DbConnectionPool>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()?;

    let genres = web::block(move || action::find_genres(&conn)).await?;

    Ok(HttpResponse::Ok().json(genres))
}

#[post("/genres")]
pub async fn post_genre(
    pool: web::Data<DbConnectionPool>,
    req: Json<CreateGenreParams>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()?;
    let params = req.into_inner();

    let genre = web::block(move || action::create_genre(&conn, params)).await?;

    Ok(HttpResponse::Created().json(genre))
}

#[get("/genres/{genre_id}")]
pub async fn get_genre(
    pool: web::Data<DbConnectionPool>,
    genre_id: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()?;
    let id = genre_id.into_inner();

    let genre = web::block(move || action::find_one_genre(&conn, id)).await?;

    Ok(HttpResponse::Ok().json(genre))
}

#[put("/genres/{genre_id}")]
pub async fn put_genre(
    pool: web::Data<DbConnectionPool>,
    genre_id: web::Path<i32>,
    req: Json<CreateGenreParams>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()?;
    let id = genre_id.into_inner();
    let params = req.into_inner();

    let genre = web::block(move || {
        params.validate()?;
        action::update_genre(&conn, id, params.update())
    }).await?;

    Ok(HttpResponse::Ok().json(genre))
}

#[patch("/genres/{genre_id}")]
pub async fn patch_genre(
    pool: web::Data<DbConnectionPool>,
    genre_id: web::Path<i32>,
    req: Json<UpdateGenreParams>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()?;
    let id = genre_id.into_inner();
    let params = req.into_inner();

    let genre = web::block(move || {
        params.validate()?;
        action::update_genre(&conn, id, params.update())
    }).await?;

    Ok(HttpResponse::Ok().json(genre))
}

#[delete("/genres/{genre_id}")]
pub async fn delete_genre(
    pool: web::Data<DbConnectionPool>,
    genre_id: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()?;
    let id = genre_id.into_inner();

    let was_present = web::block(move || action::delete_genre(&conn, id)).await?;

    if was_present {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(Error::NotFoundError)
    }
}
