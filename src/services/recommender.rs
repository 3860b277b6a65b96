use crate::{
    db::CatalogStore,
    error::{AppError, AppResult},
    models::Recommendation,
    services::{
        catalog_text,
        providers::{ChatProvider, StructuredPrompt},
    },
};

/// Generates one book recommendation for a user
///
/// Resolves the user by name first, so an unknown user fails with
/// [`AppError::NotFound`] before the model is contacted. The catalog
/// (minus the user's checkouts) and checkout history are rendered into the
/// prompt, the model is asked once, and its reply is strictly parsed.
/// There is no retry and no caching.
pub async fn generate_recommendation(
    store: &CatalogStore,
    provider: &dyn ChatProvider,
    user_name: &str,
    user_query: &str,
) -> AppResult<Recommendation> {
    if user_query.trim().is_empty() {
        return Err(AppError::EmptyInput(
            "Please enter a question or reading preference.".to_string(),
        ));
    }

    let user_id = store.user_id_by_name(user_name).await?;
    let catalog_text = catalog_text::render_catalog_excluding_user_checkouts(store, user_id).await?;
    let checkouts_text = catalog_text::render_checkout_history(store, user_id).await?;

    let request = StructuredPrompt {
        prompt: catalog_text::render_prompt(user_query, &catalog_text, &checkouts_text),
        schema_name: Recommendation::SCHEMA_NAME.to_string(),
        schema: Recommendation::json_schema(),
    };

    tracing::info!(
        user_id,
        user_name = %user_name,
        model = %provider.model(),
        "Requesting recommendation"
    );

    let content = provider.complete(&request).await?;
    let recommendation = Recommendation::from_model_output(&content).map_err(|e| {
        tracing::warn!(error = %e, content = %content, "Model output failed validation");
        e
    })?;

    tracing::info!(
        user_id,
        book_id = recommendation.book_id,
        title = %recommendation.title,
        grade = recommendation.grade,
        "Recommendation generated"
    );

    Ok(recommendation)
}
