use diesel::{AsChangeset, Insertable, Queryable};
use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::validate::ValidationErrors;
use crate::db::schema::cinema_halls;

#[derive(Clone, Debug, PartialEq, Queryable)]
pub struct CinemaHall {
    pub id: i32,
    pub name: String,
    pub rows: i32,
    pub seats_in_row: i32,
}

impl CinemaHall {
    pub fn capacity(&self) -> i64 {
        i64::from(self.rows) * i64::from(self.seats_in_row)
    }

    pub fn has_seat(&self, row: i32, seat: i32) -> bool {
        (1..=self.rows).contains(&row) && (1..=self.seats_in_row).contains(&seat)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CinemaHallView {
    pub id: i32,
    pub name: String,
    pub rows: i32,
    pub seats_in_row: i32,
    pub capacity: i64,
}

impl From<&CinemaHall> for CinemaHallView {
    fn from(hall: &CinemaHall) -> Self {
        CinemaHallView {
            id: hall.id,
            name: hall.name.clone(),
            rows: hall.rows,
            seats_in_row: hall.seats_in_row,
            capacity: hall.capacity(),
        }
    }
}

#[derive(Clone, Debug, Insertable)]
#[table_name="cinema_halls"]
pub struct NewCinemaHall {
    pub name: String,
    pub rows: i32,
    pub seats_in_row: i32,
}

#[derive(Clone, Debug, Default, AsChangeset)]
#[table_name="cinema_halls"]
pub struct CinemaHallChangeset {
    pub name: Option<String>,
    pub rows: Option<i32>,
    pub seats_in_row: Option<i32>,
}

impl CinemaHallChangeset {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.rows.is_none() && self.seats_in_row.is_none()
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct CreateCinemaHallParams {
    pub name: String,
    pub rows: i32,
    pub seats_in_row: i32,
}

impl CreateCinemaHallParams {
    pub fn validate(&self) -> Result<(), Error> {
        let mut errors = ValidationErrors::new();
        errors.require_text("name", &self.name);
        errors.require_positive("rows", self.rows);
        errors.require_positive("seats_in_row", self.seats_in_row);
        errors.into_result()
    }

    pub fn create(&self) -> NewCinemaHall {
        NewCinemaHall {
            name: self.name.trim().to_string(),
            rows: self.rows,
            seats_in_row: self.seats_in_row,
        }
    }

    pub fn update(&self) -> CinemaHallChangeset {
        CinemaHallChangeset {
            name: Some(self.name.trim().to_string()),
            rows: Some(self.rows),
            seats_in_row: Some(self.seats_in_row),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateCinemaHallParams {
    pub name: Option<String>,
    pub rows: Option<i32>,
    pub seats_in_row: Option<i32>,
}

impl UpdateCinemaHallParams {
    pub fn validate(&self) -> Result<(), Error> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.name {
            errors.require_text("name", name);
        }
        if let Some(rows) = self.rows {
            errors.require_positive("rows", rows);
        }
        if let Some(seats_in_row) = self.seats_in_row {
            errors.require_positive("seats_in_row", seats_in_row);
        }
        errors.into_result()
    }

    pub fn update(&self) -> CinemaHallChangeset {
        CinemaHallChangeset {
            name: self.name.as_ref().map(|n| n.trim().to_string()),
            rows: self.rows,
            seats_in_row: self.seats_in_row,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn hall() -> CinemaHall {
        CinemaHall { id: 1, name: "Blue".to_string(), rows: 10, seats_in_row: 14 }
    }

    #[test]
    fn view_carries_capacity() {
        assert_eq!(serde_json::to_value(CinemaHallView::from(&hall())).unwrap(), json!({
            "id": 1, "name": "Blue", "rows": 10, "seats_in_row": 14, "capacity": 140,
        }));
    }

    #[test]
    fn capacity_of_a_huge_hall_does_not_overflow() {
        let params = CreateCinemaHallParams { name: "Dome".to_string(), rows: 50_000, seats_in_row: 50_000 };
        assert!(params.validate().is_ok());

        let hall = CinemaHall { id: 3, name: params.name, rows: params.rows, seats_in_row: params.seats_in_row };
        assert_eq!(CinemaHallView::from(&hall).capacity, 2_500_000_000);
    }

    #[test]
    fn seats_are_one_based_and_bounded() {
        let hall = hall();
        assert!(hall.has_seat(1, 1));
        assert!(hall.has_seat(10, 14));
        assert!(!hall.has_seat(0, 1));
        assert!(!hall.has_seat(11, 1));
        assert!(!hall.has_seat(1, 15));
    }

    #[test]
    fn dimensions_must_be_positive() {
        let params = CreateCinemaHallParams { name: "Red".to_string(), rows: 0, seats_in_row: -2 };
        match params.validate() {
            Err(Error::ValidationError(errors)) => {
                assert!(errors.messages("name").is_empty());
                assert_eq!(errors.messages("rows").len(), 1);
                assert_eq!(errors.messages("seats_in_row").len(), 1);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
