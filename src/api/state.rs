use std::sync::Arc;

use sqlx::SqlitePool;

use crate::{db::CatalogStore, services::ChatProvider};

/// Shared application state
///
/// Holds no per-session data: a generated recommendation lives with the
/// caller and comes back in the request that acts on it.
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogStore,
    pub chat_provider: Arc<dyn ChatProvider>,
}

impl AppState {
    pub fn new(db_pool: SqlitePool, chat_provider: Arc<dyn ChatProvider>) -> Self {
        Self {
            catalog: CatalogStore::new(db_pool),
            chat_provider,
        }
    }
}
