use serde::{Deserialize, Serialize};

/// Links a user to a book they borrowed.
///
/// Neither id is checked against the users or books tables, and the same
/// pair may be recorded any number of times.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct Checkout {
    pub user_id: i64,
    pub book_id: i64,
}

/// One row of a user's checkout history joined against the catalog.
///
/// `title` and `author` are `None` when the checkout points at a book id
/// with no catalog row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct CheckoutHistoryEntry {
    pub book_id: Option<i64>,
    pub title: Option<String>,
    pub author: Option<String>,
}
