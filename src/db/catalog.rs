use sqlx::SqlitePool;

use crate::{
    error::{AppError, AppResult},
    models::{Book, Checkout, CheckoutHistoryEntry, NewBook, NewUser, User},
};

/// Users, books and checkouts backed by SQLite
///
/// Every statement is parameterized. Names and titles are not unique;
/// lookups by them return the earliest inserted match.
#[derive(Clone)]
pub struct CatalogStore {
    pool: SqlitePool,
}

impl CatalogStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Inserts a user with the next id (current maximum plus one)
    ///
    /// The id is computed inside the INSERT, so a single writer always sees
    /// 1, 2, 3, ... Nothing else guards uniqueness.
    pub async fn add_user(&self, user: &NewUser) -> AppResult<User> {
        let user_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (user_id, name, email, address)
            SELECT COALESCE(MAX(user_id), 0) + 1, ?, ?, ? FROM users
            RETURNING user_id
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.address)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(user_id, name = %user.name, "User added");

        Ok(User {
            user_id,
            name: user.name.clone(),
            email: user.email.clone(),
            address: user.address.clone(),
        })
    }

    /// Inserts a book with the next id (current maximum plus one)
    pub async fn add_book(&self, book: &NewBook) -> AppResult<Book> {
        let book_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO books (book_id, title, author, genre, description)
            SELECT COALESCE(MAX(book_id), 0) + 1, ?, ?, ?, ? FROM books
            RETURNING book_id
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.genre)
        .bind(&book.description)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(book_id, title = %book.title, "Book added");

        Ok(Book {
            book_id,
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone(),
            description: book.description.clone(),
        })
    }

    /// Records a checkout without checking that either id exists
    pub async fn add_checkout(&self, user_id: i64, book_id: i64) -> AppResult<Checkout> {
        sqlx::query("INSERT INTO user_checkouts (user_id, book_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(book_id)
            .execute(&self.pool)
            .await?;

        tracing::info!(user_id, book_id, "Checkout recorded");

        Ok(Checkout { user_id, book_id })
    }

    pub async fn user_id_by_name(&self, name: &str) -> AppResult<i64> {
        sqlx::query_scalar("SELECT user_id FROM users WHERE name = ? ORDER BY rowid LIMIT 1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User '{}' not found in the database.", name)))
    }

    pub async fn book_id_by_title(&self, title: &str) -> AppResult<i64> {
        sqlx::query_scalar("SELECT book_id FROM books WHERE title = ? ORDER BY rowid LIMIT 1")
            .bind(title)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book '{}' not found in the database.", title)))
    }

    pub async fn user_email(&self, user_id: i64) -> AppResult<String> {
        sqlx::query_scalar("SELECT email FROM users WHERE user_id = ? ORDER BY rowid LIMIT 1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User ID '{}' not found in the database.", user_id)))
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT user_id, name, email, address FROM users ORDER BY user_id, rowid",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT book_id, title, author, genre, description FROM books ORDER BY book_id, rowid",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    /// Books whose id does not appear in any of the user's checkouts
    pub async fn books_not_checked_out_by(&self, user_id: i64) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT book_id, title, author, genre, description
            FROM books
            WHERE book_id NOT IN (
                SELECT book_id FROM user_checkouts
                WHERE user_id = ? AND book_id IS NOT NULL
            )
            ORDER BY book_id, rowid
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    /// The user's checkouts in the order they were recorded, outer-joined
    /// to the catalog so dangling book ids still produce a row
    pub async fn checkout_history(&self, user_id: i64) -> AppResult<Vec<CheckoutHistoryEntry>> {
        let entries = sqlx::query_as::<_, CheckoutHistoryEntry>(
            r#"
            SELECT uc.book_id AS book_id, b.title AS title, b.author AS author
            FROM user_checkouts uc
            LEFT JOIN books b ON uc.book_id = b.book_id
            WHERE uc.user_id = ?
            ORDER BY uc.rowid
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }
}
