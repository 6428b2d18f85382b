use actix_web::{get, HttpRequest, HttpResponse, Responder, web};
use serde::Serialize;

use crate::core::Page;

pub mod actor;
pub mod auth;
pub mod genre;
pub mod hall;
pub mod movie;
pub mod order;
pub mod session;
pub mod ticket;
pub mod user;

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok()
}

/// Registers every resource under the enclosing scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .service(genre::get_genres)
        .service(genre::post_genre)
        .service(genre::get_genre)
        .service(genre::put_genre)
        .service(genre::patch_genre)
        .service(genre::delete_genre)
        .service(actor::get_actors)
        .service(actor::post_actor)
        .service(actor::get_actor)
        .service(actor::put_actor)
        .service(actor::patch_actor)
        .service(actor::delete_actor)
        .service(hall::get_cinema_halls)
        .service(hall::post_cinema_hall)
        .service(hall::get_cinema_hall)
        .service(hall::put_cinema_hall)
        .service(hall::patch_cinema_hall)
        .service(hall::delete_cinema_hall)
        .service(movie::get_movies)
        .service(movie::post_movie)
        .service(movie::get_movie)
        .service(movie::put_movie)
        .service(movie::patch_movie)
        .service(movie::delete_movie)
        .service(session::get_movie_sessions)
        .service(session::post_movie_session)
        .service(session::get_movie_session)
        .service(session::put_movie_session)
        .service(session::patch_movie_session)
        .service(session::delete_movie_session)
        .service(ticket::get_tickets)
        .service(ticket::get_ticket)
        .service(ticket::delete_ticket)
        .service(order::get_orders)
        .service(order::post_order)
        .service(order::get_order)
        .service(order::delete_order);
}

#[derive(Serialize)]
pub struct PageResponse<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> PageResponse<T> {
    /// `page_size` is repeated in the links only when the client asked for one.
    pub fn from_page(page: Page<T>, page_size: Option<i64>, base_url: String) -> PageResponse<T> {
        let link = |number: i64| {
            let query_parts: Vec<String> = vec![
                Some(number).filter(|n| *n > 1).map(|n| format!("page={}", n)),
                page_size.map(|s| format!("page_size={}", s)),
            ].into_iter().flatten().collect();

            if query_parts.is_empty() {
                base_url.clone()
            } else {
                format!("{}?{}", base_url, query_parts.join("&"))
            }
        };

        PageResponse {
            count: page.count,
            next: Some(page.page_number.saturating_add(1)).filter(|_| page.has_next()).map(&link),
            previous: Some(page.page_number - 1).filter(|_| page.has_previous()).map(&link),
            results: page.items,
        }
    }
}

pub fn base_url(req: &HttpRequest) -> String {
    let info = req.connection_info();
    format!("{}://{}{}", info.scheme(), info.host(), req.path())
}

#[cfg(test)]
pub(crate) mod tests {
    use actix_web::{App, test};
    use actix_web::web::{Data, scope};
    use diesel::pg::PgConnection;
    use diesel::r2d2::ConnectionManager;
    use serde_json::json;

    use super::*;
    use crate::db::DbConnectionPool;

    /// A pool that never connects unless a handler checks a connection out.
    pub(crate) fn idle_pool() -> Data<DbConnectionPool> {
        let manager = ConnectionManager::<PgConnection>::new("postgres://localhost/unused");
        Data::new(r2d2::Pool::builder().min_idle(Some(0)).build_unchecked(manager))
    }

    fn page(page_number: i64, count: i64) -> Page<i32> {
        Page { page_number, page_size: 2, count, items: vec![1, 2] }
    }

    #[actix_rt::test]
    async fn health_is_ok() {
        let mut app = test::init_service(App::new().service(health)).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&mut app, req).await;
        assert!(resp.status().is_success());
    }

    #[actix_rt::test]
    async fn orders_require_a_token() {
        let mut app = test::init_service(
            App::new()
                .app_data(idle_pool())
                .service(scope("/cinema").configure(configure))
        ).await;

        let req = test::TestRequest::get().uri("/cinema/orders").to_request();
        let resp = test::call_service(&mut app, req).await;
        assert_eq!(resp.status().as_u16(), 401);

        let req = test::TestRequest::get()
            .uri("/cinema/orders")
            .header("Authorization", "Token nope")
            .to_request();
        let resp = test::call_service(&mut app, req).await;
        assert_eq!(resp.status().as_u16(), 401);
    }

    #[actix_rt::test]
    async fn malformed_filters_are_bad_requests() {
        let mut app = test::init_service(
            App::new()
                .app_data(idle_pool())
                .service(scope("/cinema").configure(configure))
        ).await;

        let req = test::TestRequest::get().uri("/cinema/movies?genres=1,drama").to_request();
        let resp = test::call_service(&mut app, req).await;
        assert_eq!(resp.status().as_u16(), 400);

        let req = test::TestRequest::get().uri("/cinema/movie_sessions?date=tomorrow").to_request();
        let resp = test::call_service(&mut app, req).await;
        assert_eq!(resp.status().as_u16(), 400);
    }

    #[test]
    fn first_page_links_forward_only() {
        let response = PageResponse::from_page(page(1, 5), None, "http://x/cinema/orders".to_string());
        assert_eq!(response.next.as_deref(), Some("http://x/cinema/orders?page=2"));
        assert_eq!(response.previous, None);
    }

    #[test]
    fn second_page_links_back_without_page_param() {
        let response = PageResponse::from_page(page(2, 5), Some(2), "http://x/cinema/orders".to_string());
        assert_eq!(response.next.as_deref(), Some("http://x/cinema/orders?page=3&page_size=2"));
        assert_eq!(response.previous.as_deref(), Some("http://x/cinema/orders?page_size=2"));
    }

    #[test]
    fn page_body_shape() {
        let response = PageResponse::from_page(page(3, 6), None, "http://x/o".to_string());
        assert_eq!(serde_json::to_value(&response).unwrap(), json!({
            "count": 6,
            "next": null,
            "previous": "http://x/o?page=2",
            "results": [1, 2],
        }));
    }
}
