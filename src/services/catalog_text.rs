//! Prompt context for recommendation requests
//!
//! Turns catalog rows and checkout history into the plain-text blocks the
//! chat model sees, and fills in the prompt template.

use crate::{
    db::CatalogStore,
    error::AppResult,
    models::{Book, CheckoutHistoryEntry},
};

/// Returned instead of a listing when every book is filtered out
pub const EMPTY_CATALOG: &str = "No books in the catalog yet. Or all books are checked out for user.";

/// Returned instead of a listing when the user has no checkouts
pub const NO_CHECKOUTS: &str = "No previous checkouts.";

const MISSING_FIELD: &str = "N/A";

const PROMPT_TEMPLATE: &str = r#"You are a helpful library assistant who recommends books based on user tastes.
The user is looking for help with: "{user_query}"

Below is a list of available books in the library's catalog (books not checked out yet):
{catalog}

The user has previously checked out the following books:
{checkouts}

Suggest 1 book (from the catalog) that might be relevant or interesting for the user.
Explain your recommendation, provide a rating (0-100), summarize an email to the user,
and give a brief synopsis of the book.
"#;

/// Lists every book the user has not checked out, one per line
pub async fn render_catalog_excluding_user_checkouts(
    store: &CatalogStore,
    user_id: i64,
) -> AppResult<String> {
    let books = store.books_not_checked_out_by(user_id).await?;
    Ok(format_catalog(&books))
}

/// Lists the user's previous checkouts, one per line
pub async fn render_checkout_history(store: &CatalogStore, user_id: i64) -> AppResult<String> {
    let history = store.checkout_history(user_id).await?;
    Ok(format_checkouts(&history))
}

pub fn format_catalog(books: &[Book]) -> String {
    if books.is_empty() {
        return EMPTY_CATALOG.to_string();
    }

    books
        .iter()
        .map(|book| {
            format!(
                "- Title: {}, Book_id: {}, Author: {}, Genre: {}, Desc: {}",
                book.title, book.book_id, book.author, book.genre, book.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_checkouts(history: &[CheckoutHistoryEntry]) -> String {
    if history.is_empty() {
        return NO_CHECKOUTS.to_string();
    }

    history
        .iter()
        .map(|entry| {
            format!(
                "- Book ID: {}, Title: {}, Author: {}",
                entry
                    .book_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| MISSING_FIELD.to_string()),
                entry.title.as_deref().unwrap_or(MISSING_FIELD),
                entry.author.as_deref().unwrap_or(MISSING_FIELD),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Substitutes the query and both context blocks into the prompt template
pub fn render_prompt(user_query: &str, catalog_text: &str, checkouts_text: &str) -> String {
    // Single pass so placeholders inside user-supplied text stay literal.
    let mut prompt = String::with_capacity(
        PROMPT_TEMPLATE.len() + user_query.len() + catalog_text.len() + checkouts_text.len(),
    );
    let mut rest = PROMPT_TEMPLATE;

    while let Some(start) = rest.find('{') {
        prompt.push_str(&rest[..start]);
        let after = &rest[start..];
        let (value, consumed) = if after.starts_with("{user_query}") {
            (user_query, "{user_query}".len())
        } else if after.starts_with("{catalog}") {
            (catalog_text, "{catalog}".len())
        } else if after.starts_with("{checkouts}") {
            (checkouts_text, "{checkouts}".len())
        } else {
            ("{", 1)
        };
        prompt.push_str(value);
        rest = &after[consumed..];
    }
    prompt.push_str(rest);

    prompt
}
