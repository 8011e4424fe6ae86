//! User-defined grouping of subscriptions.

use super::validation::{check_id, check_name, Validate, ValidationError};
use serde::{Deserialize, Serialize};

/// Named list that subscriptions may reference through `listId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub id: String,
    pub name: String,
}

impl List {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl Validate for List {
    fn validate(&self) -> Result<(), ValidationError> {
        check_id("id", &self.id)?;
        check_name("name", &self.name)
    }
}
