//! Side-effecting actions on a recommendation the caller already holds
//!
//! Each action is independent; nothing spans them, so a checkout that
//! fails after an email went out leaves the email sent. The recommendation
//! comes back from the caller, so it is validated again before use.

use crate::{
    db::CatalogStore,
    error::AppResult,
    models::{Checkout, EmailReceipt, Recommendation},
    services::email,
};

/// Emails the recommendation to the named user through the placeholder mailer
pub async fn send_recommendation_email(
    store: &CatalogStore,
    user_name: &str,
    recommendation: &Recommendation,
) -> AppResult<EmailReceipt> {
    recommendation.validate()?;
    let user_id = store.user_id_by_name(user_name).await?;
    let user_email = store.user_email(user_id).await?;
    let body = email::format_recommendation_email(user_name, recommendation);

    Ok(email::send_email(
        &user_email,
        email::RECOMMENDATION_SUBJECT,
        &body,
    ))
}

/// Records a checkout of the recommended book for the named user
///
/// The book is resolved by the recommendation's title; the model-reported
/// `book_id` is not consulted.
pub async fn checkout_recommendation(
    store: &CatalogStore,
    user_name: &str,
    recommendation: &Recommendation,
) -> AppResult<Checkout> {
    recommendation.validate()?;
    let book_id = store.book_id_by_title(&recommendation.title).await?;
    let user_id = store.user_id_by_name(user_name).await?;

    if book_id != recommendation.book_id {
        tracing::warn!(
            title = %recommendation.title,
            reported_book_id = recommendation.book_id,
            catalog_book_id = book_id,
            "Model-reported book id differs from catalog"
        );
    }

    store.add_checkout(user_id, book_id).await
}
