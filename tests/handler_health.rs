mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use linkforge::api::handlers::health_handler;

#[tokio::test]
async fn test_health_endpoint_success() {
    let repo = common::InMemoryLinkRepository::new();
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(common::create_test_state(repo));

    let server = TestServer::new(app).unwrap();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert!(json.get("version").is_some());
}

#[tokio::test]
async fn test_health_endpoint_store_down() {
    let repo = common::InMemoryLinkRepository::new();
    repo.set_store_down(true);
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(common::create_test_state(repo));

    let server = TestServer::new(app).unwrap();

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 503);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["database"]["status"], "error");
}
