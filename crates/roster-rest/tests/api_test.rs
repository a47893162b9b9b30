//! HTTP-level tests for the REST router over the in-memory store.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use roster_config::{ObservabilityConfig, ServerConfig};
use roster_core::{HealthCheck, HealthStatus};
use roster_repository::{FailurePoint, InMemoryPersonRepository};
use roster_rest::{create_router, AppState};
use roster_service::{CacheTtls, NoopEnricher, PersonServiceImpl, ServiceCaches};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

struct StaticCheck(HealthStatus);

#[async_trait]
impl HealthCheck for StaticCheck {
    fn name(&self) -> &str {
        "database"
    }

    async fn check(&self) -> HealthStatus {
        self.0.clone()
    }
}

struct TestApp {
    repo: Arc<InMemoryPersonRepository>,
    router: Router,
}

fn app_with(database: HealthStatus) -> TestApp {
    let repo = Arc::new(InMemoryPersonRepository::new());
    let caches = ServiceCaches::new();
    let service = Arc::new(PersonServiceImpl::new(
        repo.clone(),
        Arc::new(NoopEnricher),
        &caches,
        CacheTtls::default(),
    ));
    let state = AppState::new(service).with_health_check(Arc::new(StaticCheck(database)));
    let observability = ObservabilityConfig {
        metrics_enabled: false,
        ..ObservabilityConfig::default()
    };
    TestApp {
        repo,
        router: create_router(state, &ServerConfig::default(), &observability),
    }
}

fn app() -> TestApp {
    app_with(HealthStatus::Healthy)
}

async fn send(app: &TestApp, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn create_person(app: &TestApp, first: &str, last: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/people",
        Some(json!({ "first_name": first, "last_name": last })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = app();

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, _) = send(&app, "GET", "/live", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);
    assert_eq!(body["dependencies"][0]["name"], "database");
}

#[tokio::test]
async fn test_readiness_fails_when_database_is_down() {
    let app = app_with(HealthStatus::Unhealthy("connection refused".to_string()));

    let (status, body) = send(&app, "GET", "/ready", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["ready"], false);
    assert_eq!(body["dependencies"][0]["status"], "unhealthy");
}

#[tokio::test]
async fn test_create_and_get_person() {
    let app = app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/people",
        Some(json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "contacts": ["ada@example.com"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["first_name"], "Ada");
    assert_eq!(body["data"]["contacts"][0]["address"], "ada@example.com");
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(&app, "GET", &format!("/api/v1/people/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["last_name"], "Lovelace");
    assert_eq!(body["data"]["relationships"], json!([]));
}

#[tokio::test]
async fn test_create_person_validation_error() {
    let app = app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/people",
        Some(json!({ "first_name": "  ", "last_name": "Lovelace" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["details"][0]["field"], "first_name");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/people")
        .header("content-type", "application/json")
        .body(Body::from("{\"first_name\":"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_person_is_not_found() {
    let app = app();

    let (status, body) = send(&app, "GET", "/api/v1/people/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, body) = send(&app, "GET", "/api/v1/people/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_update_and_delete_person() {
    let app = app();
    let id = create_person(&app, "Ada", "Lovelace").await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/v1/people/{id}"),
        Some(json!({ "last_name": "King", "age": 36 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["last_name"], "King");
    assert_eq!(body["data"]["age"], 36);

    let (status, _) = send(&app, "DELETE", &format!("/api/v1/people/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "DELETE", &format!("/api/v1/people/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_and_search_people() {
    let app = app();
    create_person(&app, "Ada", "Lovelace").await;
    create_person(&app, "Byron", "lovelace").await;
    create_person(&app, "Charles", "Babbage").await;

    let (status, body) = send(&app, "GET", "/api/v1/people?limit=2&offset=0", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["limit"], 2);
    assert_eq!(body["data"]["data"].as_array().unwrap().len(), 2);

    let (status, body) = send(&app, "GET", "/api/v1/people/lastname/LOVELACE", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_contact_lifecycle_keeps_single_primary() {
    let app = app();
    let id = create_person(&app, "Ada", "Lovelace").await;

    let (status, first) = send(
        &app,
        "POST",
        &format!("/api/v1/people/{id}/contacts"),
        Some(json!({ "address": "ada@example.com", "is_primary": true })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let first_id = first["data"]["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/v1/people/{id}/contacts"),
        Some(json!({ "address": "countess@example.com", "is_primary": true })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, view) = send(&app, "GET", &format!("/api/v1/people/{id}"), None).await;
    let primaries: Vec<&Value> = view["data"]["contacts"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|c| c["is_primary"] == true)
        .collect();
    assert_eq!(primaries.len(), 1);
    assert_eq!(primaries[0]["address"], "countess@example.com");

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/v1/contacts/{first_id}"),
        Some(json!({ "address": "not-an-email" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, _) = send(&app, "DELETE", &format!("/api/v1/contacts/{first_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(app.repo.contacts_of(id.into()).len(), 1);
}

#[tokio::test]
async fn test_friend_endpoints() {
    let app = app();
    let a = create_person(&app, "Ada", "Lovelace").await;
    let b = create_person(&app, "Charles", "Babbage").await;

    let uri = format!("/api/v1/people/{a}/friends/{b}");
    let (status, _) = send(&app, "POST", &uri, None).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "POST", &uri, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");

    let (status, body) = send(&app, "GET", &format!("/api/v1/people/{b}/friends"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], a);

    let (status, _) = send(&app, "POST", &format!("/api/v1/people/{a}/friends/{a}"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_store_failure_is_opaque_internal_error() {
    let app = app();
    app.repo.fail_on(FailurePoint::ListPeople);

    let (status, body) = send(&app, "GET", "/api/v1/people", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["message"], "Internal server error");
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = app();

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}
