use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};

/// Lowest and highest grade the model may assign
pub const GRADE_RANGE: std::ops::RangeInclusive<i64> = 0..=100;

/// A single book recommendation produced by the chat model.
///
/// Never persisted. Callers hold on to it between requests themselves
/// (hidden form fields in the UI, the request body in the JSON API).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Recommendation {
    /// The title of the book
    pub title: String,
    /// Catalog id of the book, as reported by the model
    pub book_id: i64,
    /// Why the book was recommended
    pub feedback: String,
    /// How well the book fits the user, 0 to 100
    pub grade: i64,
    /// A brief synopsis of the recommended book
    pub synopsis: String,
    /// Summarized email body to send to the user
    pub summarized_email_body: String,
}

impl Recommendation {
    /// Name used for the structured-output schema
    pub const SCHEMA_NAME: &'static str = "Recommendation";

    /// Parses and validates raw model output.
    ///
    /// The output must be a single JSON object with exactly the six fields
    /// of [`Recommendation`], a non-blank title, and a grade in 0..=100.
    /// Anything else is reported as [`AppError::Validation`].
    pub fn from_model_output(content: &str) -> AppResult<Self> {
        let recommendation: Recommendation = serde_json::from_str(content.trim())
            .map_err(|e| AppError::Validation(format!("Recommendation did not match schema: {}", e)))?;
        recommendation.validate()?;
        Ok(recommendation)
    }

    /// Checks the constraints the JSON schema alone cannot enforce
    pub fn validate(&self) -> AppResult<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation(
                "Recommendation title is empty".to_string(),
            ));
        }
        if !GRADE_RANGE.contains(&self.grade) {
            return Err(AppError::Validation(format!(
                "Recommendation grade {} is outside {}..={}",
                self.grade,
                GRADE_RANGE.start(),
                GRADE_RANGE.end()
            )));
        }
        Ok(())
    }

    /// JSON schema sent to the model to constrain its output
    pub fn json_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "The title of the book"
                },
                "book_id": {
                    "type": "integer",
                    "description": "Parse unique identifier of the book"
                },
                "feedback": {
                    "type": "string",
                    "description": "The feedback for the book and why it was recommended"
                },
                "grade": {
                    "type": "integer",
                    "description": "The grade of the book recommendation, based on prior checkouts, 0 to 100"
                },
                "summarized_email_body": {
                    "type": "string",
                    "description": "The summarized email body to send to the user"
                },
                "synopsis": {
                    "type": "string",
                    "description": "A brief synopsis of the recommended book"
                }
            },
            "required": [
                "title",
                "book_id",
                "feedback",
                "grade",
                "summarized_email_body",
                "synopsis"
            ],
            "additionalProperties": false
        })
    }
}
