use diesel::{Insertable, Queryable};
use serde::{Deserialize, Serialize};

use crate::core::session::MovieSessionDetailView;
use crate::db::schema::tickets;

#[derive(Clone, Debug, PartialEq, Queryable)]
pub struct Ticket {
    pub id: i32,
    pub row: i32,
    pub seat: i32,
    pub movie_session_id: i32,
    pub order_id: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TicketView {
    pub id: i32,
    pub row: i32,
    pub seat: i32,
    pub movie_session: MovieSessionDetailView,
}

impl TicketView {
    pub fn new(ticket: &Ticket, movie_session: MovieSessionDetailView) -> Self {
        TicketView {
            id: ticket.id,
            row: ticket.row,
            seat: ticket.seat,
            movie_session,
        }
    }
}

/// One seat requested as part of an order; echoed back in the create response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TicketParams {
    pub row: i32,
    pub seat: i32,
    pub movie_session: i32,
}

impl TicketParams {
    pub fn create(&self, order_id: i32) -> NewTicket {
        NewTicket {
            row: self.row,
            seat: self.seat,
            movie_session_id: self.movie_session,
            order_id,
        }
    }
}

impl From<&Ticket> for TicketParams {
    fn from(ticket: &Ticket) -> Self {
        TicketParams {
            row: ticket.row,
            seat: ticket.seat,
            movie_session: ticket.movie_session_id,
        }
    }
}

#[derive(Clone, Debug, Insertable)]
#[table_name="tickets"]
pub struct NewTicket {
    pub row: i32,
    pub seat: i32,
    pub movie_session_id: i32,
    pub order_id: i32,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::core::hall::{CinemaHall, CinemaHallView};
    use crate::core::movie::MovieListView;
    use crate::core::movie::tests::matrix;
    use crate::core::session::TakenPlace;
    use crate::core::session::tests::summary;

    #[test]
    fn view_nests_the_session_detail() {
        let ticket = Ticket { id: 11, row: 2, seat: 5, movie_session_id: 7, order_id: 3 };
        let hall = CinemaHall { id: 2, name: "Blue".to_string(), rows: 10, seats_in_row: 14 };
        let session = MovieSessionDetailView::new(
            &summary(1),
            MovieListView::from(&matrix()),
            CinemaHallView::from(&hall),
            vec![TakenPlace { row: 2, seat: 5 }],
        );
        let value = serde_json::to_value(TicketView::new(&ticket, session)).unwrap();

        assert_eq!(value["id"], json!(11));
        assert_eq!(value["row"], json!(2));
        assert_eq!(value["seat"], json!(5));
        assert_eq!(value["movie_session"]["id"], json!(7));
        assert_eq!(value["movie_session"]["tickets_available"], json!(139));
        assert_eq!(value["movie_session"]["movie"]["title"], json!("The Matrix"));
        assert_eq!(value["movie_session"]["cinema_hall"]["capacity"], json!(140));
        assert_eq!(value["movie_session"]["taken_places"], json!([{"row": 2, "seat": 5}]));
    }

    #[test]
    fn params_bind_to_an_order() {
        let params = TicketParams { row: 1, seat: 2, movie_session: 7 };
        let new = params.create(42);
        assert_eq!((new.row, new.seat, new.movie_session_id, new.order_id), (1, 2, 7, 42));
    }
}
