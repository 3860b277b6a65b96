use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// A library patron
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    /// Assigned as the current maximum plus one
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub address: String,
}

/// Input for creating a user, as submitted by the add-user form
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewUser {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
}

impl NewUser {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            address: address.into(),
        }
    }

    /// Name and email are required; address may be blank
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() {
            return Err(AppError::EmptyInput(
                "Please enter both a name and an email address.".to_string(),
            ));
        }
        Ok(())
    }
}
