use std::collections::HashMap;

use diesel::pg::Pg;
use diesel::prelude::*;
use log::debug;

use crate::core::Page;
use crate::core::error::Error;
use crate::core::order::{NewOrder, Order, OrderView};
use crate::core::ticket::{NewTicket, Ticket, TicketParams, TicketView};
use crate::db::{ticket, DbConnection};
use crate::db::pagination::*;
use crate::db::schema::{orders, tickets};

/// One page of a user's orders, newest first.
pub fn find_orders(conn: &DbConnection, user_id: i32, page: i64, page_size: i64) -> Result<Page<OrderView>, Error> {
    let query = orders::table
        .filter(orders::user_id.eq(user_id))
        .order((orders::created_at.desc(), orders::id.desc()))
        .paginate(page, page_size);

    debug!("{}", diesel::debug_query::<Pg, _>(&query));

    let (found, count) = query.load_and_count::<Order>(conn)?;

    debug!("found orders {:?} count={}", found, count);

    Ok(Page {
        page_number: page,
        page_size,
        count,
        items: with_tickets(conn, found)?,
    })
}

pub fn find_one_order(conn: &DbConnection, user_id: i32, order_id: i32) -> Result<Option<OrderView>, Error> {
    let found: Option<Order> = orders::table
        .filter(orders::user_id.eq(user_id))
        .filter(orders::id.eq(order_id))
        .first(conn)
        .optional()?;

    match found {
        None => Ok(None),
        Some(order) => Ok(with_tickets(conn, vec![order])?.pop()),
    }
}

/// Writes the order and every ticket bound to it, all or nothing.
pub fn create_order(conn: &DbConnection, user_id: i32, requested: &[TicketParams]) -> Result<(Order, Vec<Ticket>), Error> {
    conn.transaction::<_, Error, _>(|| {
        let order: Order = diesel::insert_into(orders::table)
            .values(&NewOrder { user_id })
            .get_result(conn)?;

        let new_tickets = ticket_rows(order.id, requested);

        let query = diesel::insert_into(tickets::table)
            .values(&new_tickets);

        debug!("{}", diesel::debug_query::<Pg, _>(&query));

        let created: Vec<Ticket> = query.get_results(conn)?;

        Ok((order, created))
    })
}

pub fn delete_order(conn: &DbConnection, user_id: i32, order_id: i32) -> Result<bool, Error> {
    let query = diesel::delete(
        orders::table
            .filter(orders::user_id.eq(user_id))
            .filter(orders::id.eq(order_id))
    );

    debug!("{}", diesel::debug_query::<Pg, _>(&query));

    query
        .execute(conn)
        .map_err(Error::from)
        .map(|r| r > 0)
}

fn ticket_rows(order_id: i32, requested: &[TicketParams]) -> Vec<NewTicket> {
    requested.iter()
        .map(|t| t.create(order_id))
        .collect()
}

fn with_tickets(conn: &DbConnection, found: Vec<Order>) -> Result<Vec<OrderView>, Error> {
    if found.is_empty() {
        return Ok(Vec::new())
    }

    let order_ids: Vec<i32> = found.iter().map(|o| o.id).collect();
    let order_tickets = ticket::find_order_tickets(conn, &order_ids)?;
    let views = ticket::with_sessions(conn, &order_tickets)?;

    let mut by_order: HashMap<i32, Vec<TicketView>> = HashMap::new();
    for (t, view) in order_tickets.iter().zip(views) {
        by_order.entry(t.order_id).or_insert_with(Vec::new).push(view);
    }

    Ok(found.iter()
        .map(|order| OrderView::new(order, by_order.remove(&order.id).unwrap_or_default()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tickets_go_in_one_multi_row_insert() {
        let requested = vec![
            TicketParams { row: 1, seat: 1, movie_session: 7 },
            TicketParams { row: 1, seat: 2, movie_session: 7 },
            TicketParams { row: 4, seat: 9, movie_session: 8 },
        ];
        let rows = ticket_rows(42, &requested);
        assert!(rows.iter().all(|t| t.order_id == 42));

        let query = diesel::insert_into(tickets::table).values(&rows);
        let sql = diesel::debug_query::<Pg, _>(&query).to_string();

        assert_eq!(sql.matches("INSERT INTO").count(), 1);
        assert!(sql.contains("VALUES ($1, $2, $3, $4), ($5, $6, $7, $8), ($9, $10, $11, $12)"));
        assert!(!sql.contains("$13"));
    }

    #[test]
    fn orders_page_newest_first() {
        let query = orders::table
            .filter(orders::user_id.eq(1))
            .order((orders::created_at.desc(), orders::id.desc()))
            .paginate(2, 2);
        let sql = diesel::debug_query::<Pg, _>(&query).to_string();

        assert!(sql.contains("ORDER BY \"orders\".\"created_at\" DESC, \"orders\".\"id\" DESC"));
        assert!(sql.contains("LIMIT $2 OFFSET $3"));
    }
}
