use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{Book, Checkout, EmailReceipt, NewBook, NewUser, Recommendation, User},
    services::{generate_recommendation, library},
};

use super::{AppJson, AppState};

// Request types

#[derive(Debug, Deserialize)]
pub struct CreateCheckoutRequest {
    pub user_id: i64,
    pub book_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub user_name: String,
    pub user_query: String,
}

/// A recommendation handed back by the caller together with the user it
/// was generated for
#[derive(Debug, Deserialize, Serialize)]
pub struct RecommendationAction {
    pub user_name: String,
    pub recommendation: Recommendation,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    Ok(Json(state.catalog.list_users().await?))
}

pub async fn create_user(
    State(state): State<AppState>,
    AppJson(request): AppJson<NewUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    request.validate()?;
    let user = state.catalog.add_user(&request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<Book>>> {
    Ok(Json(state.catalog.list_books().await?))
}

pub async fn create_book(
    State(state): State<AppState>,
    AppJson(request): AppJson<NewBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    request.validate()?;
    let book = state.catalog.add_book(&request).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Records a checkout by id; neither id is checked
pub async fn create_checkout(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateCheckoutRequest>,
) -> AppResult<(StatusCode, Json<Checkout>)> {
    let checkout = state
        .catalog
        .add_checkout(request.user_id, request.book_id)
        .await?;
    Ok((StatusCode::CREATED, Json(checkout)))
}

pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    AppJson(request): AppJson<RecommendationRequest>,
) -> AppResult<Json<Recommendation>> {
    tracing::info!(
        request_id = %request_id,
        user_name = %request.user_name,
        "Processing recommendation request"
    );

    let recommendation = generate_recommendation(
        &state.catalog,
        state.chat_provider.as_ref(),
        &request.user_name,
        &request.user_query,
    )
    .await?;

    Ok(Json(recommendation))
}

pub async fn email_recommendation(
    State(state): State<AppState>,
    AppJson(action): AppJson<RecommendationAction>,
) -> AppResult<Json<EmailReceipt>> {
    let receipt =
        library::send_recommendation_email(&state.catalog, &action.user_name, &action.recommendation)
            .await?;
    Ok(Json(receipt))
}

pub async fn checkout_recommendation(
    State(state): State<AppState>,
    AppJson(action): AppJson<RecommendationAction>,
) -> AppResult<(StatusCode, Json<Checkout>)> {
    let checkout =
        library::checkout_recommendation(&state.catalog, &action.user_name, &action.recommendation)
            .await?;
    Ok((StatusCode::CREATED, Json(checkout)))
}
