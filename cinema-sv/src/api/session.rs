use actix_web::{delete, get, patch, post, put, HttpResponse, web};
use actix_web::web::Json;

use crate::core::action;
use crate::core::error::Error;
use crate::core::session::{CreateMovieSessionParams, SessionFilter, SessionQuery, UpdateMovieSessionParams};
use crate::db::{DbConnection, DbConnectionPool};

#[get("/movie_sessions")]
pub async fn get_movie_sessions(
    pool: web::Data<DbConnectionPool>,
    query: web::Query<SessionQuery>,
) -> Result<HttpResponse, Error> {
    let filter = SessionFilter::from(query.into_inner());
    let conn: DbConnection = pool.get()?;

    let sessions = web::block(move || action::find_movie_sessions(&conn, &filter)).await?;

    Ok(HttpResponse::Ok().json(sessions))
}

#[post("/movie_sessions")]
pub async fn post_movie_session(
    pool: web::Data<DbConnectionPool>,
    req: Json<CreateMovieSessionParams>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()?;
    let params = req.into_inner();

    let session = web::block(move || action::create_movie_session(&conn, params)).await?;

    Ok(HttpResponse::Created().json(session))
}

#[get("/movie_sessions/{session_id}")]
pub async fn get_movie_session(
    pool: web::Data<DbConnectionPool>,
    session_id: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()?;
    let id = session_id.into_inner();

    let session = web::block(move || action::find_one_movie_session(&conn, id)).await?;

    Ok(HttpResponse::Ok().json(session))
}

#[put("/movie_sessions/{session_id}")]
pub async fn put_movie_session(
    pool: web::Data<DbConnectionPool>,
    session_id: web::Path<i32>,
    req: Json<CreateMovieSessionParams>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()?;
    let id = session_id.into_inner();
    let changes = req.into_inner().update();

    let session = web::block(move || action::update_movie_session(&conn, id, changes)).await?;

    Ok(HttpResponse::Ok().json(session))
}

#[patch("/movie_sessions/{session_id}")]
pub async fn patch_movie_session(
    pool: web::Data<DbConnectionPool>,
    session_id: web::Path<i32>,
    req: Json<UpdateMovieSessionParams>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()?;
    let id = session_id.into_inner();
    let changes = req.into_inner().update();

    let session = web::block(move || action::update_movie_session(&conn, id, changes)).await?;

    Ok(HttpResponse::Ok().json(session))
}

#[delete("/movie_sessions/{session_id}")]
pub async fn delete_movie_session(
    pool: web::Data<DbConnectionPool>,
    session_id: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()?;
    let id = session_id.into_inner();

    let was_present = web::block(move || action::delete_movie_session(&conn, id)).await?;

    if was_present {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(Error::NotFoundError)
    }
}
