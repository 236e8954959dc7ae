//! Route-level tests for the playground endpoints.

use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use ormpad_studio::{config::StudioConfig, create_router, state::AppState};
use serde_json::{json, Value};

fn server(seed: bool) -> TestServer {
    let config = StudioConfig {
        seed,
        ..StudioConfig::default()
    };
    let state = AppState::new(config).unwrap();
    TestServer::new(create_router(state)).unwrap()
}

fn xhr() -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-requested-with"),
        HeaderValue::from_static("XMLHttpRequest"),
    )
}

#[tokio::test]
async fn index_renders_editor_and_schema_sidebar() {
    let server = server(false);
    let response = server.get("/").await;
    response.assert_status_ok();

    let body = response.text();
    assert!(body.contains("ormpad playground"));
    assert!(body.contains("<textarea"));
    // Sidebar lists entities with introspected labels.
    assert!(body.contains("Author"));
    assert!(body.contains("Character (255)"));
    assert!(body.contains("Foreign Key"));
}

#[tokio::test]
async fn xhr_post_returns_json_result() {
    let server = server(false);
    let (name, value) = xhr();
    let response = server
        .post("/")
        .add_header(name, value)
        .form(&json!({ "code": "1 + 1" }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["result"], "2\n");
    assert!(body["queries"].as_array().unwrap().is_empty());
    assert!(body["execution_time"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn xhr_post_includes_query_trace() {
    let server = server(true);
    let (name, value) = xhr();
    let response = server
        .post("/")
        .add_header(name, value)
        .form(&json!({ "code": "Book.count()" }))
        .await;

    let body: Value = response.json();
    assert_eq!(body["result"], "30\n");
    let queries = body["queries"].as_array().unwrap();
    assert_eq!(queries.len(), 1);
    assert!(queries[0]["sql"]
        .as_str()
        .unwrap()
        .starts_with("SELECT COUNT(*)"));
}

#[tokio::test]
async fn plain_form_post_rerenders_the_page() {
    let server = server(false);
    let response = server.post("/").form(&json!({ "code": "print('hi')" })).await;
    response.assert_status_ok();

    let body = response.text();
    assert!(body.contains("<pre>hi\n</pre>"));
    assert!(body.contains("print(&#39;hi&#39;)") || body.contains("print('hi')"));
}

#[tokio::test]
async fn snippet_errors_are_not_http_errors() {
    let server = server(false);
    let (name, value) = xhr();
    let response = server
        .post("/")
        .add_header(name, value)
        .form(&json!({ "code": "nope + 1" }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert!(body["result"]
        .as_str()
        .unwrap()
        .starts_with("Error: undefined variable"));
}

#[tokio::test]
async fn health_reports_service_and_entities() {
    let server = server(false);
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "ormpad-studio");
    assert_eq!(body["entities"], 4);
}
