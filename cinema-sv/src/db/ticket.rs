use diesel::pg::Pg;
use diesel::prelude::*;
use log::debug;

use crate::core::error::Error;
use crate::core::ticket::{Ticket, TicketView};
use crate::db::{distinct_ids, session, DbConnection};
use crate::db::schema::tickets;

pub fn find_tickets(conn: &DbConnection) -> Result<Vec<TicketView>, Error> {
    let found: Vec<Ticket> = tickets::table
        .order(tickets::id.asc())
        .load(conn)?;

    with_sessions(conn, &found)
}

pub fn find_one_ticket(conn: &DbConnection, ticket_id: i32) -> Result<Option<TicketView>, Error> {
    let found: Option<Ticket> = tickets::table
        .find(ticket_id)
        .first(conn)
        .optional()?;

    match found {
        None => Ok(None),
        Some(ticket) => Ok(with_sessions(conn, &[ticket])?.pop()),
    }
}

pub fn find_order_tickets(conn: &DbConnection, order_ids: &[i32]) -> Result<Vec<Ticket>, Error> {
    tickets::table
        .filter(tickets::order_id.eq_any(order_ids))
        .order(tickets::id.asc())
        .load(conn)
        .map_err(Error::from)
}

pub fn delete_ticket(conn: &DbConnection, ticket_id: i32) -> Result<bool, Error> {
    let query = diesel::delete(tickets::table.find(ticket_id));

    debug!("{}", diesel::debug_query::<Pg, _>(&query));

    query
        .execute(conn)
        .map_err(Error::from)
        .map(|r| r > 0)
}

/// Pairs each ticket with the detail view of its session, keeping ticket order.
pub fn with_sessions(conn: &DbConnection, found: &[Ticket]) -> Result<Vec<TicketView>, Error> {
    let session_ids: Vec<i32> = found.iter().map(|t| t.movie_session_id).collect();
    let details = session::find_details_by_id(conn, distinct_ids(&session_ids))?;

    found.iter()
        .map(|ticket| {
            details.get(&ticket.movie_session_id)
                .map(|detail| TicketView::new(ticket, detail.clone()))
                .ok_or(Error::NotFoundError)
        })
        .collect()
}
