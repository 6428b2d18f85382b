use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::core::error::Error;

/// Field name to messages, rendered as the body of a 400 response.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        ValidationErrors(BTreeMap::new())
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn invalid_pk(value: &str) -> String {
        format!("Invalid pk \"{}\" - object does not exist.", value)
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string())
            .or_insert_with(Vec::new)
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn require_text(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, "This field may not be blank.");
        }
    }

    pub fn require_positive(&mut self, field: &str, value: i32) {
        if value < 1 {
            self.add(field, "Ensure this value is greater than or equal to 1.");
        }
    }

    /// Flags every requested id that is not among the ids found in the database.
    pub fn require_existing(&mut self, field: &str, requested: &[i32], existing: &[i32]) {
        let existing: HashSet<i32> = existing.iter().copied().collect();
        let mut reported = HashSet::new();
        for id in requested {
            if !existing.contains(id) && reported.insert(*id) {
                self.add(field, Self::invalid_pk(&id.to_string()));
            }
        }
    }

    pub fn into_result(self) -> Result<(), Error> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::ValidationError(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}
