use actix_web::{delete, get, patch, post, put, HttpResponse, web};
use actix_web::web::Json;

use crate::core::action;
use crate::core::error::Error;
use crate::core::filter::{MovieFilter, MovieQuery};
use crate::core::movie::{CreateMovieParams, UpdateMovieParams};
use crate::db::{DbConnection, DbConnectionPool};

#[get("/movies")]
pub async fn get_movies(
    pool: web::Data<DbConnectionPool>,
    query: web::Query<MovieQuery>,
) -> Result<HttpResponse, Error> {
    let filter = MovieFilter::parse(&query.into_inner())?;
    let conn: DbConnection = pool.get()?;

    let movies = web::block(move || action::find_movies(&conn, &filter)).await?;

    Ok(HttpResponse::Ok().json(movies))
}

#[post("/movies")]
pub async fn post_movie(
    pool: web::Data<DbConnectionPool>,
    req: Json<CreateMovieParams>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()?;
    let params = req.into_inner();

    let movie = web::block(move || action::create_movie(&conn, params)).await?;

    Ok(HttpResponse::Created().json(movie))
}

#[get("/movies/{movie_id}")]
pub async fn get_movie(
    pool: web::Data<DbConnectionPool>,
    movie_id: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()?;
    let id = movie_id.into_inner();

    let movie = web::block(move || action::find_one_movie(&conn, id)).await?;

    Ok(HttpResponse::Ok().json(movie))
}

#[put("/movies/{movie_id}")]
pub async fn put_movie(
    pool: web::Data<DbConnectionPool>,
    movie_id: web::Path<i32>,
    req: Json<CreateMovieParams>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()?;
    let id = movie_id.into_inner();
    let params = req.into_inner();

    let movie = web::block(move || {
        params.validate()?;
        action::update_movie(&conn, id, params.update())
    }).await?;

    Ok(HttpResponse::Ok().json(movie))
}

#[patch("/movies/{movie_id}")]
pub async fn patch_movie(
    pool: web::Data<DbConnectionPool>,
    movie_id: web::Path<i32>,
    req: Json<UpdateMovieParams>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()?;
    let id = movie_id.into_inner();
    let params = req.into_inner();

    let movie = web::block(move || {
        params.validate()?;
        action::update_movie(&conn, id, params.update())
    }).await?;

    Ok(HttpResponse::Ok().json(movie))
}

#[delete("/movies/{movie_id}")]
pub async fn delete_movie(
    pool: web::Data<DbConnectionPool>,
    movie_id: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()?;
    let id = movie_id.into_inner();

    let was_present = web::block(move || action::delete_movie(&conn, id)).await?;

    if was_present {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(Error::NotFoundError)
    }
}
