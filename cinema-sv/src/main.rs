#[macro_use]
extern crate diesel;

use std::io;

use actix_web::{App, HttpServer, middleware};
use actix_web::web::{Data, scope};
use diesel::PgConnection;
use diesel::r2d2::ConnectionManager;
use log::info;

use crate::config::Config;

mod api;
mod config;
mod core;
mod db;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    std::env::set_var("RUST_LOG",
      format!("{}actix_web=debug", std::env::var("RUST_LOG")
          .map_or_else(|_| "".to_string(), |ll| format!("{},", ll))
      ));
    env_logger::init();

    let config = Config::from_env()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let pg_mgr = ConnectionManager::<PgConnection>::new(&config.database_url);
    let pg_pool = Data::new(r2d2::Pool::builder()
        .max_size(config.pool_size)
        .build(pg_mgr)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?);

    info!("Starting server at: {}", &config.bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(pg_pool.clone())
            .wrap(middleware::Logger::default())
            .service(api::health)
            .service(api::user::post_user)
            .service(scope("/cinema").configure(api::configure))
    })
    .bind(config.bind_address)?
    .max_connections(1000)
    .client_timeout(250)
    .run()
    .await
}
