use std::sync::Arc;

use library_recs::{
    api::{create_router, AppState},
    config::Config,
    db,
    services::OpenAiProvider,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    library_recs::init_tracing();

    let config = Config::from_env()?;
    let api_key = config.require_openai_api_key()?.to_string();

    let pool = db::create_pool(&config.database_path).await?;
    db::run_migrations(&pool).await?;

    let provider = OpenAiProvider::new(
        api_key,
        config.openai_api_url.clone(),
        config.openai_model.clone(),
        config.openai_temperature,
        config.openai_max_tokens,
    );

    // Initialize application state
    let state = AppState::new(pool, Arc::new(provider));

    // Create the router with all routes
    let app = create_router(state);

    // Start the server
    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(
        address = %address,
        database = %config.database_path.display(),
        model = %config.openai_model,
        "Server running"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
