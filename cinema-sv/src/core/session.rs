use chrono::{DateTime, NaiveDate, Utc};
use diesel::sql_types::{BigInt, Integer, Text, Timestamptz};
use diesel::{AsChangeset, Insertable, Queryable, QueryableByName};
use serde::{Deserialize, Serialize};

use crate::core::hall::CinemaHallView;
use crate::core::movie::MovieListView;
use crate::db::schema::movie_sessions;

#[derive(Clone, Debug, PartialEq, Queryable)]
pub struct MovieSession {
    pub id: i32,
    pub show_time: DateTime<Utc>,
    pub movie_id: i32,
    pub cinema_hall_id: i32,
}

/// Create and update response: movie and hall as ids.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MovieSessionView {
    pub id: i32,
    pub show_time: DateTime<Utc>,
    pub movie: i32,
    pub cinema_hall: i32,
}

impl From<&MovieSession> for MovieSessionView {
    fn from(s: &MovieSession) -> Self {
        MovieSessionView {
            id: s.id,
            show_time: s.show_time,
            movie: s.movie_id,
            cinema_hall: s.cinema_hall_id,
        }
    }
}

/// One session joined with its movie title, hall and booked ticket count.
#[derive(Clone, Debug, PartialEq, QueryableByName)]
pub struct SessionSummary {
    #[sql_type = "Integer"]
    pub id: i32,
    #[sql_type = "Timestamptz"]
    pub show_time: DateTime<Utc>,
    #[sql_type = "Integer"]
    pub movie_id: i32,
    #[sql_type = "Integer"]
    pub cinema_hall_id: i32,
    #[sql_type = "Text"]
    pub movie_title: String,
    #[sql_type = "Text"]
    pub cinema_hall_name: String,
    #[sql_type = "BigInt"]
    pub cinema_hall_capacity: i64,
    #[sql_type = "BigInt"]
    pub tickets_booked: i64,
}

impl SessionSummary {
    pub fn tickets_available(&self) -> i64 {
        self.cinema_hall_capacity - self.tickets_booked
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MovieSessionListView {
    pub id: i32,
    pub show_time: DateTime<Utc>,
    pub movie_title: String,
    pub cinema_hall_name: String,
    pub cinema_hall_capacity: i64,
    pub tickets_available: i64,
}

impl From<&SessionSummary> for MovieSessionListView {
    fn from(s: &SessionSummary) -> Self {
        MovieSessionListView {
            id: s.id,
            show_time: s.show_time,
            movie_title: s.movie_title.clone(),
            cinema_hall_name: s.cinema_hall_name.clone(),
            cinema_hall_capacity: s.cinema_hall_capacity,
            tickets_available: s.tickets_available(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Queryable)]
pub struct TakenPlace {
    pub row: i32,
    pub seat: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MovieSessionDetailView {
    pub id: i32,
    pub show_time: DateTime<Utc>,
    pub movie: MovieListView,
    pub cinema_hall: CinemaHallView,
    pub movie_title: String,
    pub cinema_hall_name: String,
    pub cinema_hall_capacity: i64,
    pub taken_places: Vec<TakenPlace>,
    pub tickets_available: i64,
}

impl MovieSessionDetailView {
    pub fn new(
        summary: &SessionSummary,
        movie: MovieListView,
        cinema_hall: CinemaHallView,
        taken_places: Vec<TakenPlace>,
    ) -> Self {
        MovieSessionDetailView {
            id: summary.id,
            show_time: summary.show_time,
            movie,
            cinema_hall,
            movie_title: summary.movie_title.clone(),
            cinema_hall_name: summary.cinema_hall_name.clone(),
            cinema_hall_capacity: summary.cinema_hall_capacity,
            taken_places,
            tickets_available: summary.tickets_available(),
        }
    }
}

/// Which sessions to summarize; unset fields do not filter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionFilter {
    pub ids: Option<Vec<i32>>,
    pub date: Option<NaiveDate>,
    pub movie: Option<i32>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SessionQuery {
    pub date: Option<NaiveDate>,
    pub movie: Option<i32>,
}

impl From<SessionQuery> for SessionFilter {
    fn from(q: SessionQuery) -> Self {
        SessionFilter {
            ids: None,
            date: q.date,
            movie: q.movie,
        }
    }
}

#[derive(Clone, Debug, Insertable)]
#[table_name="movie_sessions"]
pub struct NewMovieSession {
    pub show_time: DateTime<Utc>,
    pub movie_id: i32,
    pub cinema_hall_id: i32,
}

#[derive(Clone, Debug, Default, AsChangeset)]
#[table_name="movie_sessions"]
pub struct MovieSessionChangeset {
    pub show_time: Option<DateTime<Utc>>,
    pub movie_id: Option<i32>,
    pub cinema_hall_id: Option<i32>,
}

impl MovieSessionChangeset {
    pub fn is_empty(&self) -> bool {
        self.show_time.is_none() && self.movie_id.is_none() && self.cinema_hall_id.is_none()
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct CreateMovieSessionParams {
    pub show_time: DateTime<Utc>,
    pub movie: i32,
    pub cinema_hall: i32,
}

impl CreateMovieSessionParams {
    pub fn create(&self) -> NewMovieSession {
        NewMovieSession {
            show_time: self.show_time,
            movie_id: self.movie,
            cinema_hall_id: self.cinema_hall,
        }
    }

    pub fn update(&self) -> MovieSessionChangeset {
        MovieSessionChangeset {
            show_time: Some(self.show_time),
            movie_id: Some(self.movie),
            cinema_hall_id: Some(self.cinema_hall),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateMovieSessionParams {
    pub show_time: Option<DateTime<Utc>>,
    pub movie: Option<i32>,
    pub cinema_hall: Option<i32>,
}

impl UpdateMovieSessionParams {
    pub fn update(&self) -> MovieSessionChangeset {
        MovieSessionChangeset {
            show_time: self.show_time,
            movie_id: self.movie,
            cinema_hall_id: self.cinema_hall,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::core::hall::CinemaHall;
    use crate::core::movie::tests::matrix;

    pub(crate) fn summary(booked: i64) -> SessionSummary {
        SessionSummary {
            id: 7,
            show_time: Utc.ymd(2024, 10, 9).and_hms(20, 30, 0),
            movie_id: 1,
            cinema_hall_id: 2,
            movie_title: "The Matrix".to_string(),
            cinema_hall_name: "Blue".to_string(),
            cinema_hall_capacity: 140,
            tickets_booked: booked,
        }
    }

    #[test]
    fn availability_is_capacity_minus_booked() {
        assert_eq!(summary(0).tickets_available(), 140);
        assert_eq!(summary(3).tickets_available(), 137);
        assert_eq!(summary(140).tickets_available(), 0);
    }

    #[test]
    fn list_view_shape() {
        assert_eq!(serde_json::to_value(MovieSessionListView::from(&summary(2))).unwrap(), json!({
            "id": 7,
            "show_time": "2024-10-09T20:30:00Z",
            "movie_title": "The Matrix",
            "cinema_hall_name": "Blue",
            "cinema_hall_capacity": 140,
            "tickets_available": 138,
        }));
    }

    #[test]
    fn detail_view_lists_taken_places() {
        let hall = CinemaHall { id: 2, name: "Blue".to_string(), rows: 10, seats_in_row: 14 };
        let taken = vec![TakenPlace { row: 1, seat: 4 }, TakenPlace { row: 3, seat: 9 }];
        let view = MovieSessionDetailView::new(
            &summary(2),
            MovieListView::from(&matrix()),
            CinemaHallView::from(&hall),
            taken,
        );
        let value = serde_json::to_value(&view).unwrap();

        assert_eq!(value["taken_places"], json!([{"row": 1, "seat": 4}, {"row": 3, "seat": 9}]));
        assert_eq!(value["tickets_available"], json!(138));
        assert_eq!(value["movie"]["genres"], json!(["Action", "Sci-Fi"]));
        assert_eq!(value["cinema_hall"]["capacity"], json!(140));
    }

    #[test]
    fn query_becomes_filter() {
        let filter = SessionFilter::from(SessionQuery {
            date: Some(NaiveDate::from_ymd(2024, 10, 9)),
            movie: None,
        });
        assert_eq!(filter.ids, None);
        assert_eq!(filter.date, Some(NaiveDate::from_ymd(2024, 10, 9)));
    }

    #[test]
    fn create_params_accept_rfc3339() {
        let params: CreateMovieSessionParams = serde_json::from_value(json!({
            "show_time": "2024-10-09T20:30:00+02:00",
            "movie": 1,
            "cinema_hall": 2,
        })).unwrap();
        assert_eq!(params.create().show_time, Utc.ymd(2024, 10, 9).and_hms(18, 30, 0));
    }
}
