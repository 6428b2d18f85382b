use chrono::{DateTime, Utc};
use diesel::{Insertable, Queryable};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::error::Error;
use crate::core::validate::ValidationErrors;
use crate::db::schema::users;

#[derive(Clone, Debug, PartialEq, Serialize, Queryable)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub token: Uuid,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Insertable)]
#[table_name="users"]
pub struct NewUser {
    pub username: String,
    pub token: Uuid,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RegisterUserParams {
    pub username: String,
}

impl RegisterUserParams {
    pub fn validate(&self) -> Result<(), Error> {
        let mut errors = ValidationErrors::new();
        errors.require_text("username", &self.username);
        if self.username.chars().any(char::is_whitespace) {
            errors.add("username", "Enter a valid username.");
        }
        errors.into_result()
    }

    pub fn create(&self) -> NewUser {
        NewUser {
            username: self.username.clone(),
            token: Uuid::new_v4(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_registration_gets_a_fresh_token() {
        let params = RegisterUserParams { username: "neo".to_string() };
        assert!(params.validate().is_ok());
        assert_ne!(params.create().token, params.create().token);
    }

    #[test]
    fn usernames_cannot_contain_spaces() {
        let params = RegisterUserParams { username: "thomas anderson".to_string() };
        assert!(params.validate().is_err());
    }
}
