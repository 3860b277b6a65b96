use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// A book in the library catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct Book {
    /// Assigned as the current maximum plus one
    pub book_id: i64,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub description: String,
}

/// Input for adding a book, as submitted by the add-book form
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewBook {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub description: String,
}

impl NewBook {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
            description: description.into(),
        }
    }

    /// Title and author are required
    pub fn validate(&self) -> AppResult<()> {
        if self.title.trim().is_empty() || self.author.trim().is_empty() {
            return Err(AppError::EmptyInput(
                "Please enter at least a title and author.".to_string(),
            ));
        }
        Ok(())
    }
}
