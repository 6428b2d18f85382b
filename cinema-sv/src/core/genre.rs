use diesel::{AsChangeset, Insertable, Queryable};
use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::validate::ValidationErrors;
use crate::db::schema::genres;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Queryable)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

#[derive(Clone, Debug, Insertable)]
#[table_name="genres"]
pub struct NewGenre {
    pub name: String,
}

#[derive(Clone, Debug, Default, AsChangeset)]
#[table_name="genres"]
pub struct GenreChangeset {
    pub name: Option<String>,
}

impl GenreChangeset {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct CreateGenreParams {
    pub name: String,
}

impl CreateGenreParams {
    pub fn validate(&self) -> Result<(), Error> {
        let mut errors = ValidationErrors::new();
        errors.require_text("name", &self.name);
        errors.into_result()
    }

    pub fn create(&self) -> NewGenre {
        NewGenre {
            name: self.name.trim().to_string(),
        }
    }

    pub fn update(&self) -> GenreChangeset {
        GenreChangeset {
            name: Some(self.name.trim().to_string()),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateGenreParams {
    pub name: Option<String>,
}

impl UpdateGenreParams {
    pub fn validate(&self) -> Result<(), Error> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.name {
            errors.require_text("name", name);
        }
        errors.into_result()
    }

    pub fn update(&self) -> GenreChangeset {
        GenreChangeset {
            name: self.name.as_ref().map(|n| n.trim().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_is_rejected() {
        let params = CreateGenreParams { name: "  ".to_string() };
        assert!(matches!(params.validate(), Err(Error::ValidationError(_))));
    }

    #[test]
    fn partial_update_without_fields_is_empty() {
        let params = UpdateGenreParams { name: None };
        assert!(params.validate().is_ok());
        assert!(params.update().is_empty());
    }

    #[test]
    fn names_are_trimmed() {
        let params = CreateGenreParams { name: " Drama ".to_string() };
        assert_eq!(params.create().name, "Drama");
        assert_eq!(params.update().name.as_deref(), Some("Drama"));
    }
}
