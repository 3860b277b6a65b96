//! The librarian's interactive page
//!
//! Every action renders the whole page again. Failures never escape as
//! HTTP errors; they are shown inline and the page stays usable.

pub mod page;

use axum::{
    extract::{rejection::FormRejection, State},
    response::Html,
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;

use crate::{
    api::AppState,
    error::AppError,
    models::{NewBook, NewUser, Recommendation},
    services::{generate_recommendation, library},
};

use page::{Notice, PageView};

#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    pub user_name: String,
    #[serde(default)]
    pub user_query: String,
}

/// A recommendation echoed back from the page's hidden fields
#[derive(Debug, Deserialize)]
pub struct RecommendationForm {
    pub user_name: String,
    pub title: String,
    pub book_id: i64,
    pub feedback: String,
    pub grade: i64,
    pub synopsis: String,
    pub summarized_email_body: String,
}

impl RecommendationForm {
    fn into_parts(self) -> (String, Recommendation) {
        let recommendation = Recommendation {
            title: self.title,
            book_id: self.book_id,
            feedback: self.feedback,
            grade: self.grade,
            synopsis: self.synopsis,
            summarized_email_body: self.summarized_email_body,
        };
        (self.user_name, recommendation)
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/users", post(add_user))
        .route("/books", post(add_book))
        .route("/recommend", post(recommend))
        .route("/recommend/email", post(send_email))
        .route("/recommend/checkout", post(checkout_book))
}

/// Loads the tables and renders; a storage failure becomes one more notice
async fn render(state: &AppState, mut view: PageView) -> Html<String> {
    let users = state.catalog.list_users().await;
    let books = state.catalog.list_books().await;

    let users = users.unwrap_or_else(|e| {
        view.notices.push(Notice::Error(format!("Error loading users: {}", e)));
        Vec::new()
    });
    let books = books.unwrap_or_else(|e| {
        view.notices.push(Notice::Error(format!("Error loading books: {}", e)));
        Vec::new()
    });

    Html(page::render_page(&view, &users, &books))
}

/// Missing form input is shown as-is; everything else gets the action prefix
fn failure(prefix: &str, error: &AppError) -> String {
    match error {
        AppError::EmptyInput(message) => message.clone(),
        other => format!("{}: {}", prefix, other),
    }
}

/// Renders a rejected form submission as an inline error
async fn rejected(state: &AppState, prefix: &str, rejection: FormRejection) -> Html<String> {
    tracing::warn!(error = %rejection, "Form submission rejected");
    let error = AppError::from(rejection);
    render(state, PageView::error(failure(prefix, &error))).await
}

async fn index(State(state): State<AppState>) -> Html<String> {
    render(&state, PageView::default()).await
}

async fn add_user(
    State(state): State<AppState>,
    form: Result<Form<NewUser>, FormRejection>,
) -> Html<String> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => return rejected(&state, "Error adding user", rejection).await,
    };
    let result = match form.validate() {
        Ok(()) => state.catalog.add_user(&form).await,
        Err(e) => Err(e),
    };

    let view = match result {
        Ok(user) => PageView::success(format!("User '{}' added successfully!", user.name)),
        Err(e) => PageView::error(failure("Error adding user", &e)),
    };
    render(&state, view).await
}

async fn add_book(
    State(state): State<AppState>,
    form: Result<Form<NewBook>, FormRejection>,
) -> Html<String> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => return rejected(&state, "Error adding book", rejection).await,
    };
    let result = match form.validate() {
        Ok(()) => state.catalog.add_book(&form).await,
        Err(e) => Err(e),
    };

    let view = match result {
        Ok(book) => PageView::success(format!("Book '{}' added successfully!", book.title)),
        Err(e) => PageView::error(failure("Error adding book", &e)),
    };
    render(&state, view).await
}

async fn recommend(
    State(state): State<AppState>,
    form: Result<Form<GenerateForm>, FormRejection>,
) -> Html<String> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => return rejected(&state, "Error", rejection).await,
    };
    let result = generate_recommendation(
        &state.catalog,
        state.chat_provider.as_ref(),
        &form.user_name,
        &form.user_query,
    )
    .await;

    let mut view = match result {
        Ok(recommendation) => PageView {
            recommendation: Some(recommendation),
            ..PageView::success("Recommendation generated successfully!")
        },
        Err(e) => {
            tracing::warn!(error = %e, user_name = %form.user_name, "Recommendation failed");
            PageView::error(failure("Error", &e))
        }
    };
    view.selected_user = Some(form.user_name);
    view.user_query = form.user_query;

    render(&state, view).await
}

async fn send_email(
    State(state): State<AppState>,
    form: Result<Form<RecommendationForm>, FormRejection>,
) -> Html<String> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => return rejected(&state, "Error sending email", rejection).await,
    };
    let (user_name, recommendation) = form.into_parts();

    let mut view =
        match library::send_recommendation_email(&state.catalog, &user_name, &recommendation).await {
            Ok(receipt) => PageView {
                email_body: Some(receipt.body),
                ..PageView::success(format!("Email sent to {} successfully!", receipt.to))
            },
            Err(e) => PageView::error(failure("Error sending email", &e)),
        };
    view.selected_user = Some(user_name);
    view.recommendation = Some(recommendation);

    render(&state, view).await
}

async fn checkout_book(
    State(state): State<AppState>,
    form: Result<Form<RecommendationForm>, FormRejection>,
) -> Html<String> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => return rejected(&state, "Error checking out book", rejection).await,
    };
    let (user_name, recommendation) = form.into_parts();

    let mut view =
        match library::checkout_recommendation(&state.catalog, &user_name, &recommendation).await {
            Ok(_) => PageView::success(format!(
                "Book '{}' checked out successfully!",
                recommendation.title
            )),
            Err(e) => PageView::error(failure("Error checking out book", &e)),
        };
    view.selected_user = Some(user_name);
    view.recommendation = Some(recommendation);

    render(&state, view).await
}
