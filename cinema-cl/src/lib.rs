use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::CinemaError::{MissingTokenError, UnexpectedStatusCode};

pub struct CinemaConfig {
    pub url: String,
    /// Needed only for the order endpoints.
    pub token: Option<Uuid>,
}

#[derive(Error, Debug)]
pub enum CinemaError {
    #[error("error calling server: {0}")]
    ClientError(#[from] reqwest::Error),
    #[error("unexpected status code {0}")]
    UnexpectedStatusCode(StatusCode),
    #[error("no token configured")]
    MissingTokenError,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateGenreRequest {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActorName {
    pub full_name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateActorRequest {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CinemaHall {
    pub id: i32,
    pub name: String,
    pub rows: i32,
    pub seats_in_row: i32,
    pub capacity: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateCinemaHallRequest {
    pub name: String,
    pub rows: i32,
    pub seats_in_row: i32,
}

/// A movie as listed, with genre and actor names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub duration: i32,
    pub genres: Vec<String>,
    pub actors: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub duration: i32,
    pub genres: Vec<Genre>,
    pub actors: Vec<Actor>,
}

/// A movie as written, with genre and actor ids.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub duration: i32,
    pub genres: Vec<i32>,
    pub actors: Vec<i32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateMovieRequest {
    pub title: String,
    pub description: String,
    pub duration: i32,
    pub genres: Vec<i32>,
    pub actors: Vec<i32>,
}

/// Actor tokens are ids or name fragments, matched by the server.
#[derive(Clone, Debug, Default)]
pub struct MovieFilter {
    pub title: Option<String>,
    pub actors: Vec<String>,
    pub genres: Vec<i32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovieSession {
    pub id: i32,
    pub show_time: DateTime<Utc>,
    pub movie: i32,
    pub cinema_hall: i32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateMovieSessionRequest {
    pub show_time: DateTime<Utc>,
    pub movie: i32,
    pub cinema_hall: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovieSessionSummary {
    pub id: i32,
    pub show_time: DateTime<Utc>,
    pub movie_title: String,
    pub cinema_hall_name: String,
    pub cinema_hall_capacity: i64,
    pub tickets_available: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub row: i32,
    pub seat: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovieSessionDetail {
    pub id: i32,
    pub show_time: DateTime<Utc>,
    pub movie: MovieSummary,
    pub cinema_hall: CinemaHall,
    pub taken_places: Vec<Place>,
    pub tickets_available: i64,
}

#[derive(Clone, Debug, Default)]
pub struct MovieSessionFilter {
    pub date: Option<NaiveDate>,
    pub movie: Option<i32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub token: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TicketRequest {
    pub row: i32,
    pub seat: i32,
    pub movie_session: i32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub tickets: Vec<TicketRequest>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreatedOrder {
    pub id: i32,
    pub tickets: Vec<TicketRequest>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i32,
    pub row: i32,
    pub seat: i32,
    pub movie_session: MovieSessionDetail,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i32,
    pub user: i32,
    pub tickets: Vec<Ticket>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderPage {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<Order>,
}

pub async fn get_genres(cfg: &CinemaConfig) -> Result<Vec<Genre>, CinemaError> {
    let res = request(cfg, Method::GET, "/cinema/genres").send().await?;
    expect_json(res, StatusCode::OK).await
}

pub async fn get_genre(cfg: &CinemaConfig, id: i32) -> Result<Option<Genre>, CinemaError> {
    let res = request(cfg, Method::GET, &resource("genres", id)).send().await?;
    optional_json(res).await
}

pub async fn create_genre(
    cfg: &CinemaConfig,
    req: CreateGenreRequest,
) -> Result<Genre, CinemaError> {
    let res = request(cfg, Method::POST, "/cinema/genres")
        .json(&req)
        .send()
        .await?;
    expect_json(res, StatusCode::CREATED).await
}

pub async fn get_actors(cfg: &CinemaConfig) -> Result<Vec<ActorName>, CinemaError> {
    let res = request(cfg, Method::GET, "/cinema/actors").send().await?;
    expect_json(res, StatusCode::OK).await
}

pub async fn get_actor(cfg: &CinemaConfig, id: i32) -> Result<Option<Actor>, CinemaError> {
    let res = request(cfg, Method::GET, &resource("actors", id)).send().await?;
    optional_json(res).await
}

pub async fn create_actor(
    cfg: &CinemaConfig,
    req: CreateActorRequest,
) -> Result<Actor, CinemaError> {
    let res = request(cfg, Method::POST, "/cinema/actors")
        .json(&req)
        .send()
        .await?;
    expect_json(res, StatusCode::CREATED).await
}

pub async fn get_cinema_halls(cfg: &CinemaConfig) -> Result<Vec<CinemaHall>, CinemaError> {
    let res = request(cfg, Method::GET, "/cinema/cinema_halls").send().await?;
    expect_json(res, StatusCode::OK).await
}

pub async fn get_cinema_hall(cfg: &CinemaConfig, id: i32) -> Result<Option<CinemaHall>, CinemaError> {
    let res = request(cfg, Method::GET, &resource("cinema_halls", id)).send().await?;
    optional_json(res).await
}

pub async fn create_cinema_hall(
    cfg: &CinemaConfig,
    req: CreateCinemaHallRequest,
) -> Result<CinemaHall, CinemaError> {
    let res = request(cfg, Method::POST, "/cinema/cinema_halls")
        .json(&req)
        .send()
        .await?;
    expect_json(res, StatusCode::CREATED).await
}

pub async fn get_movies(
    cfg: &CinemaConfig,
    filter: &MovieFilter,
) -> Result<Vec<MovieSummary>, CinemaError> {
    let res = request(cfg, Method::GET, "/cinema/movies")
        .query(&movie_query(filter))
        .send()
        .await?;
    expect_json(res, StatusCode::OK).await
}

pub async fn get_movie(cfg: &CinemaConfig, id: i32) -> Result<Option<MovieDetail>, CinemaError> {
    let res = request(cfg, Method::GET, &resource("movies", id)).send().await?;
    optional_json(res).await
}

pub async fn create_movie(
    cfg: &CinemaConfig,
    req: CreateMovieRequest,
) -> Result<Movie, CinemaError> {
    let res = request(cfg, Method::POST, "/cinema/movies")
        .json(&req)
        .send()
        .await?;
    expect_json(res, StatusCode::CREATED).await
}

pub async fn get_movie_sessions(
    cfg: &CinemaConfig,
    filter: &MovieSessionFilter,
) -> Result<Vec<MovieSessionSummary>, CinemaError> {
    let res = request(cfg, Method::GET, "/cinema/movie_sessions")
        .query(&session_query(filter))
        .send()
        .await?;
    expect_json(res, StatusCode::OK).await
}

pub async fn get_movie_session(
    cfg: &CinemaConfig,
    id: i32,
) -> Result<Option<MovieSessionDetail>, CinemaError> {
    let res = request(cfg, Method::GET, &resource("movie_sessions", id)).send().await?;
    optional_json(res).await
}

pub async fn create_movie_session(
    cfg: &CinemaConfig,
    req: CreateMovieSessionRequest,
) -> Result<MovieSession, CinemaError> {
    let res = request(cfg, Method::POST, "/cinema/movie_sessions")
        .json(&req)
        .send()
        .await?;
    expect_json(res, StatusCode::CREATED).await
}

pub async fn get_tickets(cfg: &CinemaConfig) -> Result<Vec<Ticket>, CinemaError> {
    let res = request(cfg, Method::GET, "/cinema/tickets").send().await?;
    expect_json(res, StatusCode::OK).await
}

pub async fn get_ticket(cfg: &CinemaConfig, id: i32) -> Result<Option<Ticket>, CinemaError> {
    let res = request(cfg, Method::GET, &resource("tickets", id)).send().await?;
    optional_json(res).await
}

pub async fn register_user(
    cfg: &CinemaConfig,
    req: RegisterUserRequest,
) -> Result<User, CinemaError> {
    let res = request(cfg, Method::POST, "/users")
        .json(&req)
        .send()
        .await?;
    expect_json(res, StatusCode::CREATED).await
}

pub async fn get_orders(
    cfg: &CinemaConfig,
    page: Option<i64>,
    page_size: Option<i64>,
) -> Result<OrderPage, CinemaError> {
    let res = authorized(cfg, Method::GET, "/cinema/orders")?
        .query(&page_query(page, page_size))
        .send()
        .await?;
    expect_json(res, StatusCode::OK).await
}

pub async fn create_order(
    cfg: &CinemaConfig,
    req: CreateOrderRequest,
) -> Result<CreatedOrder, CinemaError> {
    let res = authorized(cfg, Method::POST, "/cinema/orders")?
        .json(&req)
        .send()
        .await?;
    expect_json(res, StatusCode::CREATED).await
}

pub async fn get_order(cfg: &CinemaConfig, id: i32) -> Result<Option<Order>, CinemaError> {
    let res = authorized(cfg, Method::GET, &resource("orders", id))?
        .send()
        .await?;
    optional_json(res).await
}

/// `Ok(false)` when there was no such order for this token.
pub async fn delete_order(cfg: &CinemaConfig, id: i32) -> Result<bool, CinemaError> {
    let res = authorized(cfg, Method::DELETE, &resource("orders", id))?
        .send()
        .await?;
    deleted(res)
}

fn request(cfg: &CinemaConfig, method: Method, path: &str) -> RequestBuilder {
    let url = endpoint(&cfg.url, path);
    debug!("{} {}", method, url);
    reqwest::Client::new()
        .request(method, url)
        .header("Accept", "application/json")
}

fn authorized(cfg: &CinemaConfig, method: Method, path: &str) -> Result<RequestBuilder, CinemaError> {
    let token = cfg.token.ok_or(MissingTokenError)?;
    Ok(request(cfg, method, path).header("Authorization", token_header(token)))
}

async fn expect_json<T: DeserializeOwned>(res: Response, expected: StatusCode) -> Result<T, CinemaError> {
    match res.status() {
        status if status == expected => Ok(res.json::<T>().await?),
        unexpected => Err(UnexpectedStatusCode(unexpected)),
    }
}

async fn optional_json<T: DeserializeOwned>(res: Response) -> Result<Option<T>, CinemaError> {
    match res.status() {
        StatusCode::OK => Ok(Some(res.json::<T>().await?)),
        StatusCode::NOT_FOUND => Ok(None),
        unexpected => Err(UnexpectedStatusCode(unexpected)),
    }
}

fn deleted(res: Response) -> Result<bool, CinemaError> {
    match res.status() {
        StatusCode::NO_CONTENT => Ok(true),
        StatusCode::NOT_FOUND => Ok(false),
        unexpected => Err(UnexpectedStatusCode(unexpected)),
    }
}

fn resource(collection: &str, id: i32) -> String {
    format!("/cinema/{}/{}", collection, id)
}

fn endpoint(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

fn token_header(token: Uuid) -> String {
    format!("Token {}", token)
}

fn movie_query(filter: &MovieFilter) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(title) = &filter.title {
        query.push(("title", title.clone()));
    }
    if !filter.actors.is_empty() {
        query.push(("actors", filter.actors.join(",")));
    }
    if !filter.genres.is_empty() {
        let genres: Vec<String> = filter.genres.iter().map(i32::to_string).collect();
        query.push(("genres", genres.join(",")));
    }
    query
}

fn session_query(filter: &MovieSessionFilter) -> Vec<(&'static str, String)> {
    vec![
        filter.date.map(|d| ("date", d.format("%Y-%m-%d").to_string())),
        filter.movie.map(|m| ("movie", m.to_string())),
    ].into_iter().flatten().collect()
}

fn page_query(page: Option<i64>, page_size: Option<i64>) -> Vec<(&'static str, String)> {
    vec![
        page.map(|p| ("page", p.to_string())),
        page_size.map(|s| ("page_size", s.to_string())),
    ].into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn endpoints_join_cleanly() {
        assert_eq!(endpoint("http://localhost:8080", "/cinema/genres"), "http://localhost:8080/cinema/genres");
        assert_eq!(endpoint("http://localhost:8080/", "/users"), "http://localhost:8080/users");
    }

    #[test]
    fn single_resources_live_under_their_collection() {
        assert_eq!(resource("genres", 3), "/cinema/genres/3");
        assert_eq!(resource("orders", 12), "/cinema/orders/12");
        assert_eq!(endpoint("http://localhost:8080", &resource("tickets", 5)), "http://localhost:8080/cinema/tickets/5");
    }

    #[test]
    fn order_reads_need_a_token_too() {
        let cfg = CinemaConfig { url: "http://localhost:8080".to_string(), token: None };
        assert!(matches!(authorized(&cfg, Method::DELETE, &resource("orders", 1)), Err(MissingTokenError)));
    }

    #[test]
    fn ticket_nests_the_session_detail() {
        let ticket: Ticket = serde_json::from_value(json!({
            "id": 11,
            "row": 2,
            "seat": 5,
            "movie_session": {
                "id": 4,
                "show_time": "2024-03-09T18:30:00Z",
                "movie": {
                    "id": 1, "title": "The Matrix", "description": "", "duration": 136,
                    "genres": [], "actors": [],
                },
                "cinema_hall": {"id": 2, "name": "Dome", "rows": 50000, "seats_in_row": 50000, "capacity": 2500000000u64},
                "movie_title": "The Matrix",
                "cinema_hall_name": "Dome",
                "cinema_hall_capacity": 2500000000u64,
                "taken_places": [{"row": 2, "seat": 5}],
                "tickets_available": 2499999999u64,
            },
        })).unwrap();

        assert_eq!(ticket.movie_session.cinema_hall.capacity, 2_500_000_000);
        assert_eq!(ticket.movie_session.taken_places, vec![Place { row: 2, seat: 5 }]);
    }

    #[test]
    fn movie_filters_become_comma_lists() {
        let filter = MovieFilter {
            title: Some("matrix".to_string()),
            actors: vec!["1".to_string(), "reeves".to_string()],
            genres: vec![2, 3],
        };

        assert_eq!(movie_query(&filter), vec![
            ("title", "matrix".to_string()),
            ("actors", "1,reeves".to_string()),
            ("genres", "2,3".to_string()),
        ]);
        assert!(movie_query(&MovieFilter::default()).is_empty());
    }

    #[test]
    fn session_filters_are_optional() {
        let filter = MovieSessionFilter {
            date: Some(NaiveDate::from_ymd(2024, 3, 9)),
            movie: None,
        };

        assert_eq!(session_query(&filter), vec![("date", "2024-03-09".to_string())]);
        assert_eq!(page_query(None, Some(5)), vec![("page_size", "5".to_string())]);
    }

    #[test]
    fn orders_need_a_token() {
        let cfg = CinemaConfig { url: "http://localhost:8080".to_string(), token: None };
        assert!(matches!(authorized(&cfg, Method::GET, "/cinema/orders"), Err(MissingTokenError)));

        let token = Uuid::nil();
        assert_eq!(token_header(token), "Token 00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn session_detail_ignores_flattened_fields() {
        let detail: MovieSessionDetail = serde_json::from_value(json!({
            "id": 4,
            "show_time": "2024-03-09T18:30:00Z",
            "movie": {
                "id": 1, "title": "The Matrix", "description": "", "duration": 136,
                "genres": ["Sci-Fi"], "actors": ["Keanu Reeves"],
            },
            "cinema_hall": {"id": 2, "name": "Blue", "rows": 10, "seats_in_row": 14, "capacity": 140},
            "movie_title": "The Matrix",
            "cinema_hall_name": "Blue",
            "cinema_hall_capacity": 140,
            "taken_places": [{"row": 1, "seat": 2}],
            "tickets_available": 139,
        })).unwrap();

        assert_eq!(detail.taken_places, vec![Place { row: 1, seat: 2 }]);
        assert_eq!(detail.cinema_hall.capacity, 140);
    }
}
