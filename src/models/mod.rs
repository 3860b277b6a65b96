mod book;
mod checkout;
mod recommendation;
mod user;

pub use book::{Book, NewBook};
pub use checkout::{Checkout, CheckoutHistoryEntry};
pub use recommendation::{Recommendation, GRADE_RANGE};
pub use user::{NewUser, User};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the placeholder mailer echoes back instead of delivering
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailReceipt {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}
