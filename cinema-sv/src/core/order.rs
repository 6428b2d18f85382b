use std::collections::HashMap;

use chrono::{DateTime, Utc};
use diesel::{Insertable, Queryable};
use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::hall::CinemaHall;
use crate::core::ticket::{TicketParams, TicketView};
use crate::core::validate::ValidationErrors;
use crate::db::schema::orders;

#[derive(Clone, Debug, PartialEq, Queryable)]
pub struct Order {
    pub id: i32,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Insertable)]
#[table_name="orders"]
pub struct NewOrder {
    pub user_id: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OrderView {
    pub id: i32,
    pub user: i32,
    pub tickets: Vec<TicketView>,
    pub created_at: DateTime<Utc>,
}

impl OrderView {
    pub fn new(order: &Order, tickets: Vec<TicketView>) -> Self {
        OrderView {
            id: order.id,
            user: order.user_id,
            tickets,
            created_at: order.created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OrderCreatedView {
    pub id: i32,
    pub tickets: Vec<TicketParams>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CreateOrderParams {
    pub tickets: Vec<TicketParams>,
}

impl CreateOrderParams {
    pub fn session_ids(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = self.tickets.iter().map(|t| t.movie_session).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Checks every ticket against the hall of its session, keyed by session id.
    pub fn validate(&self, halls: &HashMap<i32, CinemaHall>) -> Result<(), Error> {
        let mut errors = ValidationErrors::new();

        if self.tickets.is_empty() {
            errors.add("tickets", "This list may not be empty.");
        }

        for (i, ticket) in self.tickets.iter().enumerate() {
            let field = |name: &str| format!("tickets[{}].{}", i, name);

            match halls.get(&ticket.movie_session) {
                None => errors.add(
                    &field("movie_session"),
                    ValidationErrors::invalid_pk(&ticket.movie_session.to_string()),
                ),
                Some(hall) => {
                    if !(1..=hall.rows).contains(&ticket.row) {
                        errors.add(&field("row"), format!(
                            "row number must be in available range: (1, rows): (1, {})", hall.rows));
                    }
                    if !(1..=hall.seats_in_row).contains(&ticket.seat) {
                        errors.add(&field("seat"), format!(
                            "seat number must be in available range: (1, seats_in_row): (1, {})", hall.seats_in_row));
                    }
                }
            }
        }

        errors.into_result()
    }
}
