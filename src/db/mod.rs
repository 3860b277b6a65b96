pub mod catalog;
pub mod sqlite;

pub use catalog::CatalogStore;
pub use sqlite::{create_memory_pool, create_pool, run_migrations};
