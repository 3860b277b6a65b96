//! Bulk-loads book.csv, checkouts.csv and users.csv into the library database.

use library_recs::{config::Config, db, ingest};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    library_recs::init_tracing();

    let config = Config::from_env()?;

    let pool = db::create_pool(&config.database_path).await?;
    db::run_migrations(&pool).await?;

    tracing::info!(
        source = %config.ingest_dir.display(),
        database = %config.database_path.display(),
        "Starting ingest"
    );

    let summary = ingest::ingest_dir(&pool, &config.ingest_dir).await?;

    tracing::info!(
        books = summary.books,
        checkouts = summary.checkouts,
        users = summary.users,
        "Ingest complete"
    );

    pool.close().await;
    Ok(())
}
