use diesel::{AsChangeset, Insertable, Queryable};
use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::validate::ValidationErrors;
use crate::db::schema::actors;

/// Serializes as the create response, without the derived full name.
#[derive(Clone, Debug, PartialEq, Serialize, Queryable)]
pub struct Actor {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
}

impl Actor {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActorView {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
}

impl From<&Actor> for ActorView {
    fn from(actor: &Actor) -> Self {
        ActorView {
            id: actor.id,
            first_name: actor.first_name.clone(),
            last_name: actor.last_name.clone(),
            full_name: actor.full_name(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActorListView {
    pub full_name: String,
}

impl From<&Actor> for ActorListView {
    fn from(actor: &Actor) -> Self {
        ActorListView {
            full_name: actor.full_name(),
        }
    }
}

#[derive(Clone, Debug, Insertable)]
#[table_name="actors"]
pub struct NewActor {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Clone, Debug, Default, AsChangeset)]
#[table_name="actors"]
pub struct ActorChangeset {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl ActorChangeset {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none()
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct CreateActorParams {
    pub first_name: String,
    pub last_name: String,
}

impl CreateActorParams {
    pub fn validate(&self) -> Result<(), Error> {
        let mut errors = ValidationErrors::new();
        errors.require_text("first_name", &self.first_name);
        errors.require_text("last_name", &self.last_name);
        errors.into_result()
    }

    pub fn create(&self) -> NewActor {
        NewActor {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
        }
    }

    pub fn update(&self) -> ActorChangeset {
        let new = self.create();
        ActorChangeset {
            first_name: Some(new.first_name),
            last_name: Some(new.last_name),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateActorParams {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UpdateActorParams {
    pub fn validate(&self) -> Result<(), Error> {
        let mut errors = ValidationErrors::new();
        if let Some(first_name) = &self.first_name {
            errors.require_text("first_name", first_name);
        }
        if let Some(last_name) = &self.last_name {
            errors.require_text("last_name", last_name);
        }
        errors.into_result()
    }

    pub fn update(&self) -> ActorChangeset {
        ActorChangeset {
            first_name: self.first_name.as_ref().map(|n| n.trim().to_string()),
            last_name: self.last_name.as_ref().map(|n| n.trim().to_string()),
        }
    }
}
