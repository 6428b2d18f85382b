use actix_web::{delete, get, patch, post, put, HttpResponse, web};
use actix_web::web::Json;

use crate::core::action;
use crate::core::actor::{CreateActorParams, UpdateActorParams};
use crate::core::error::Error;
use crate::db::{DbConnection, DbConnectionPool};

#[get("/actors")]
pub async fn get_actors(
    pool: web::Data<DbConnectionPool>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()?;

    let actors = web::block(move || action::find_actors(&conn)).await?;

    Ok(HttpResponse::Ok().json(actors))
}

#[post("/actors")]
pub async fn post_actor(
    pool: web::Data<DbConnectionPool>,
    req: Json<CreateActorParams>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()?;
    let params = req.into_inner();

    let actor = web::block(move || action::create_actor(&conn, params)).await?;

    Ok(HttpResponse::Created().json(actor))
}

#[get("/actors/{actor_id}")]
pub async fn get_actor(
    pool: web::Data<DbConnectionPool>,
    actor_id: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()?;
    let id = actor_id.into_inner();

    let actor = web::block(move || action::find_one_actor(&conn, id)).await?;

    Ok(HttpResponse::Ok().json(actor))
}

#[put("/actors/{actor_id}")]
pub async fn put_actor(
    pool: web::Data<DbConnectionPool>,
    actor_id: web::Path<i32>,
    req: Json<CreateActorParams>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()?;
    let id = actor_id.into_inner();
    let params = req.into_inner();

    let actor = web::block(move || {
        params.validate()?;
        action::update_actor(&conn, id, params.update())
    }).await?;

    Ok(HttpResponse::Ok().json(actor))
}

#[patch("/actors/{actor_id}")]
pub async fn patch_actor(
    pool: web::Data<DbConnectionPool>,
    actor_id: web::Path<i32>,
    req: Json<UpdateActorParams>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()?;
    let id = actor_id.into_inner();
    let params = req.into_inner();

    let actor = web::block(move || {
        params.validate()?;
        action::update_actor(&conn, id, params.update())
    }).await?;

    Ok(HttpResponse::Ok().json(actor))
}

#[delete("/actors/{actor_id}")]
pub async fn delete_actor(
    pool: web::Data<DbConnectionPool>,
    actor_id: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()?;
    let id = actor_id.into_inner();

    let was_present = web::block(move || action::delete_actor(&conn, id)).await?;

    if was_present {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(Error::NotFoundError)
    }
}
