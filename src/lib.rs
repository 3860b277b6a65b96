//! Librarian web app: catalog storage, prompt building and model-backed
//! book recommendations.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod middleware;
pub mod models;
pub mod services;
pub mod ui;

/// Installs the global tracing subscriber, honouring `RUST_LOG`
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
