use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use mockall::mock;
use serde_json::json;

use library_recs::{
    api::{create_router, AppState},
    db::{create_memory_pool, run_migrations},
    error::{AppError, AppResult},
    middleware::request_id::REQUEST_ID_HEADER,
    services::{ChatProvider, StructuredPrompt},
};

mock! {
    pub Provider {}

    #[async_trait::async_trait]
    impl ChatProvider for Provider {
        async fn complete(&self, request: &StructuredPrompt) -> AppResult<String>;
        fn model(&self) -> String;
    }
}

const DUNE_REPLY: &str = r#"{
    "title": "Dune",
    "book_id": 1,
    "feedback": "You asked for epic science fiction.",
    "grade": 88,
    "synopsis": "A desert planet and its spice.",
    "summarized_email_body": "We picked Dune for you."
}"#;

async fn create_test_server(provider: MockProvider) -> TestServer {
    let pool = create_memory_pool().await.unwrap();
    run_migrations(&pool).await.unwrap();
    let state = AppState::new(pool, Arc::new(provider));
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

/// Provider that must never be called
fn silent_provider() -> MockProvider {
    let mut provider = MockProvider::new();
    provider.expect_complete().times(0);
    provider.expect_model().return_const("mock-model".to_string());
    provider
}

/// Provider that answers every prompt with `reply`
fn replying_provider(reply: &'static str) -> MockProvider {
    let mut provider = MockProvider::new();
    provider
        .expect_complete()
        .returning(move |_| Ok(reply.to_string()));
    provider.expect_model().return_const("mock-model".to_string());
    provider
}

async fn seed_alice_and_dune(server: &TestServer) {
    server
        .post("/api/v1/users")
        .json(&json!({ "name": "Alice", "email": "a@x.com", "address": "addr" }))
        .await
        .assert_status(StatusCode::CREATED);
    server
        .post("/api/v1/books")
        .json(&json!({
            "title": "Dune",
            "author": "Herbert",
            "genre": "SciFi",
            "description": "desc"
        }))
        .await
        .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(silent_provider()).await;
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_header_is_returned() {
    let server = create_test_server(silent_provider()).await;
    let response = server.get("/health").await;
    assert!(response.headers().get(REQUEST_ID_HEADER).is_some());
}

#[tokio::test]
async fn test_create_and_list_users() {
    let server = create_test_server(silent_provider()).await;

    for (name, expected_id) in [("Alice", 1), ("Bob", 2), ("Carol", 3)] {
        let response = server
            .post("/api/v1/users")
            .json(&json!({ "name": name, "email": "x@x.com" }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let created: serde_json::Value = response.json();
        assert_eq!(created["user_id"], expected_id);
        assert_eq!(created["address"], "");
    }

    let response = server.get("/api/v1/users").await;
    response.assert_status_ok();
    let users: Vec<serde_json::Value> = response.json();
    assert_eq!(users.len(), 3);
    assert_eq!(users[1]["name"], "Bob");
}

#[tokio::test]
async fn test_create_user_requires_email() {
    let server = create_test_server(silent_provider()).await;

    let response = server
        .post("/api/v1/users")
        .json(&json!({ "name": "Alice", "email": "" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Please enter both a name and an email address.");
}

#[tokio::test]
async fn test_create_user_with_missing_field_is_json_bad_request() {
    let server = create_test_server(silent_provider()).await;

    let response = server
        .post("/api/v1/users")
        .json(&json!({ "name": "Alice" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Please enter both a name and an email address.");
}

#[tokio::test]
async fn test_malformed_request_body_is_json_bad_request() {
    let server = create_test_server(silent_provider()).await;

    let response = server
        .post("/api/v1/checkouts")
        .json(&json!({ "user_id": "one", "book_id": 2 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert!(body["error"].is_string());

    let response = server
        .post("/api/v1/books")
        .content_type("application/json")
        .bytes("{not json".into())
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_create_and_list_books() {
    let server = create_test_server(silent_provider()).await;
    seed_alice_and_dune(&server).await;

    let response = server.get("/api/v1/books").await;
    response.assert_status_ok();
    let books: Vec<serde_json::Value> = response.json();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["book_id"], 1);
    assert_eq!(books[0]["title"], "Dune");
}

#[tokio::test]
async fn test_checkout_with_unknown_ids_is_accepted() {
    let server = create_test_server(silent_provider()).await;

    let response = server
        .post("/api/v1/checkouts")
        .json(&json!({ "user_id": 12, "book_id": 999 }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let checkout: serde_json::Value = response.json();
    assert_eq!(checkout["book_id"], 999);
}

#[tokio::test]
async fn test_recommendation_for_unknown_user_is_not_found() {
    let server = create_test_server(silent_provider()).await;
    seed_alice_and_dune(&server).await;

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "user_name": "Bob", "user_query": "space" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("Bob"));
}

#[tokio::test]
async fn test_recommend_then_checkout_flow() {
    let server = create_test_server(replying_provider(DUNE_REPLY)).await;
    seed_alice_and_dune(&server).await;

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "user_name": "Alice", "user_query": "epic science fiction" }))
        .await;
    response.assert_status_ok();
    let recommendation: serde_json::Value = response.json();
    assert_eq!(recommendation["title"], "Dune");
    assert_eq!(recommendation["grade"], 88);

    let response = server
        .post("/api/v1/recommendations/email")
        .json(&json!({ "user_name": "Alice", "recommendation": recommendation }))
        .await;
    response.assert_status_ok();
    let receipt: serde_json::Value = response.json();
    assert_eq!(receipt["to"], "a@x.com");
    assert_eq!(receipt["subject"], "Your Library Recommendation");
    assert!(receipt["body"].as_str().unwrap().contains("Title: Dune"));

    let response = server
        .post("/api/v1/recommendations/checkout")
        .json(&json!({ "user_name": "Alice", "recommendation": recommendation }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let checkout: serde_json::Value = response.json();
    assert_eq!(checkout, json!({ "user_id": 1, "book_id": 1 }));
}

#[tokio::test]
async fn test_malformed_model_output_is_unprocessable() {
    let server = create_test_server(replying_provider(r#"{"title": "Dune", "grade": 500}"#)).await;
    seed_alice_and_dune(&server).await;

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "user_name": "Alice", "user_query": "anything" }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_provider_failure_is_bad_gateway() {
    let mut provider = MockProvider::new();
    provider
        .expect_complete()
        .times(1)
        .returning(|_| Err(AppError::ExternalApi("rate limited".to_string())));
    provider.expect_model().return_const("mock-model".to_string());
    let server = create_test_server(provider).await;
    seed_alice_and_dune(&server).await;

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "user_name": "Alice", "user_query": "anything" }))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "rate limited");
}

#[tokio::test]
async fn test_page_renders_empty_state() {
    let server = create_test_server(silent_provider()).await;

    let response = server.get("/").await;
    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("Library Recommendation Demo"));
    assert!(html.contains("No users in the system yet."));
    assert!(html.contains("No books in the catalog yet."));
}

#[tokio::test]
async fn test_page_add_user_and_book_forms() {
    let server = create_test_server(silent_provider()).await;

    let response = server
        .post("/users")
        .form(&[("name", "Alice"), ("email", "a@x.com"), ("address", "1 Main St")])
        .await;
    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("User &#39;Alice&#39; added successfully!"));
    assert!(html.contains("<td>a@x.com</td>"));

    let response = server
        .post("/books")
        .form(&[
            ("title", "Dune"),
            ("author", "Herbert"),
            ("genre", "SciFi"),
            ("description", "desc"),
        ])
        .await;
    response.assert_status_ok();
    assert!(response.text().contains("Book &#39;Dune&#39; added successfully!"));
}

#[tokio::test]
async fn test_page_errors_are_inline() {
    let server = create_test_server(silent_provider()).await;

    let response = server
        .post("/users")
        .form(&[("name", "Alice"), ("email", ""), ("address", "")])
        .await;
    response.assert_status_ok();
    assert!(response
        .text()
        .contains("<p class=\"error\">Please enter both a name and an email address.</p>"));

    let response = server
        .post("/books")
        .form(&[("title", ""), ("author", ""), ("genre", ""), ("description", "")])
        .await;
    response.assert_status_ok();
    assert!(response.text().contains("Please enter at least a title and author."));
}

#[tokio::test]
async fn test_page_recommendation_for_unknown_user_shows_error() {
    let server = create_test_server(silent_provider()).await;
    seed_alice_and_dune(&server).await;

    let response = server
        .post("/recommend")
        .form(&[("user_name", "Bob"), ("user_query", "space")])
        .await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("class=\"error\">Error: Not found: User &#39;Bob&#39; not found"));
}

#[tokio::test]
async fn test_page_recommend_email_and_checkout() {
    let server = create_test_server(replying_provider(DUNE_REPLY)).await;
    seed_alice_and_dune(&server).await;

    let response = server
        .post("/recommend")
        .form(&[("user_name", "Alice"), ("user_query", "epic science fiction")])
        .await;
    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("Recommendation generated successfully!"));
    assert!(html.contains("<strong>Title:</strong> Dune"));
    assert!(html.contains("<input type=\"hidden\" name=\"title\" value=\"Dune\">"));

    let recommendation_fields = [
        ("user_name", "Alice"),
        ("title", "Dune"),
        ("book_id", "1"),
        ("feedback", "You asked for epic science fiction."),
        ("grade", "88"),
        ("synopsis", "A desert planet and its spice."),
        ("summarized_email_body", "We picked Dune for you."),
    ];

    let response = server
        .post("/recommend/email")
        .form(&recommendation_fields)
        .await;
    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("Email sent to a@x.com successfully!"));
    assert!(html.contains("Hi Alice,"));
    // The recommendation is still on the page for the next action.
    assert!(html.contains("action=\"/recommend/checkout\""));

    let response = server
        .post("/recommend/checkout")
        .form(&recommendation_fields)
        .await;
    response.assert_status_ok();
    assert!(response
        .text()
        .contains("Book &#39;Dune&#39; checked out successfully!"));
}

#[tokio::test]
async fn test_page_checkout_of_unknown_title_shows_error() {
    let server = create_test_server(silent_provider()).await;
    seed_alice_and_dune(&server).await;

    let response = server
        .post("/recommend/checkout")
        .form(&[
            ("user_name", "Alice"),
            ("title", "Neuromancer"),
            ("book_id", "1"),
            ("feedback", "f"),
            ("grade", "50"),
            ("synopsis", "s"),
            ("summarized_email_body", "b"),
        ])
        .await;

    response.assert_status_ok();
    assert!(response.text().contains("Error checking out book: Not found: Book"));
}

#[tokio::test]
async fn test_tampered_recommendation_is_rejected() {
    let server = create_test_server(silent_provider()).await;
    seed_alice_and_dune(&server).await;
    let mut recommendation: serde_json::Value = serde_json::from_str(DUNE_REPLY).unwrap();
    recommendation["grade"] = json!(999);

    for path in ["/api/v1/recommendations/email", "/api/v1/recommendations/checkout"] {
        let response = server
            .post(path)
            .json(&json!({ "user_name": "Alice", "recommendation": recommendation }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value = response.json();
        assert!(body["error"].as_str().unwrap().contains("999"));
    }

    recommendation["grade"] = json!(88);
    recommendation["title"] = json!("");
    let response = server
        .post("/api/v1/recommendations/checkout")
        .json(&json!({ "user_name": "Alice", "recommendation": recommendation }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_page_rejected_form_is_inline() {
    let server = create_test_server(silent_provider()).await;
    seed_alice_and_dune(&server).await;

    let response = server
        .post("/recommend/checkout")
        .form(&[("user_name", "Alice"), ("title", "Dune"), ("book_id", "one")])
        .await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("<p class=\"error\">Error checking out book: Invalid request body:"));
    assert!(html.contains("<td>Dune</td>"));
}

#[tokio::test]
async fn test_page_rejects_out_of_range_grade() {
    let server = create_test_server(silent_provider()).await;
    seed_alice_and_dune(&server).await;

    let response = server
        .post("/recommend/email")
        .form(&[
            ("user_name", "Alice"),
            ("title", "Dune"),
            ("book_id", "1"),
            ("feedback", "f"),
            ("grade", "999"),
            ("synopsis", "s"),
            ("summarized_email_body", "b"),
        ])
        .await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("Error sending email: Invalid recommendation: Recommendation grade 999"));
    assert!(!html.contains("Email sent to"));
}
