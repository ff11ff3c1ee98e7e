//! End-to-end tests for the validation middleware over the wired router.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use api::routes;
use api::validation::SchemaCatalogue;

const SERVICE_ID: &str = "0c3de4d1-9d6e-4f0c-b2cd-bb47c4db1dcd";

fn app() -> Router {
    let catalogue = SchemaCatalogue::new().expect("schema catalogue must build");
    routes::router(&catalogue)
}

async fn send(method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

#[tokio::test]
async fn test_create_service_sanitizes_and_strips_unknown_fields() {
    let (status, body) = send(
        "POST",
        "/api/services",
        Some(json!({"name": "  API Gateway  ", "hacker": "x"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["name"], json!("API Gateway"));
    assert_eq!(body["data"]["status"], json!("operational"));
    assert!(body["data"].get("hacker").is_none());
}

#[tokio::test]
async fn test_validation_failure_envelope_is_exact() {
    let (status, body) = send("POST", "/api/services", Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Validation failed"));
    assert_eq!(body["code"], json!("VALIDATION_ERROR"));
    assert_eq!(body["errors"]["name"], json!("is required"));
    assert_eq!(body.as_object().unwrap().len(), 4);
}

#[tokio::test]
async fn test_malformed_json_body() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/services")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["errors"]["body"], json!("must be valid JSON"));
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    // Past the adapter's 1 MiB cap
    let oversized = "x".repeat(2 * 1024 * 1024);
    let (status, body) = send("POST", "/api/services", Some(json!({"name": oversized}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("VALIDATION_ERROR"));
    assert!(body["errors"]["body"]
        .as_str()
        .unwrap()
        .contains("size limit"));
}

#[tokio::test]
async fn test_filter_pagination_defaults() {
    let (status, body) = send("GET", "/api/services", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["page"], json!(1));
    assert_eq!(body["data"]["limit"], json!(20));
}

#[tokio::test]
async fn test_filter_coerces_and_caps_pagination() {
    let (status, body) = send("GET", "/api/services?page=3&limit=50", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["page"], json!(3));
    assert_eq!(body["data"]["limit"], json!(50));

    let (status, body) = send("GET", "/api/services?limit=500", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["limit"], json!("must be at most 100"));
}

#[tokio::test]
async fn test_multi_section_violations_are_merged_and_prefixed() {
    let (status, body) = send(
        "PATCH",
        "/api/services/not-a-uuid",
        Some(json!({"status": "on-fire"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["errors"].as_object().unwrap();
    assert_eq!(errors["path.id"], json!("must be a valid UUID"));
    assert!(errors["body.status"]
        .as_str()
        .unwrap()
        .starts_with("must be one of:"));
    // The invalid status does not count toward the update schema's
    // minimum-present rule, so the schema-level violation is reported too.
    assert_eq!(
        errors["body._schema"],
        json!("at least one field is required")
    );
    assert_eq!(errors.len(), 3);
}

#[tokio::test]
async fn test_update_with_empty_payload_is_rejected() {
    let uri = format!("/api/services/{}", SERVICE_ID);
    let (status, body) = send("PATCH", &uri, Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"]["body._schema"],
        json!("at least one field is required")
    );
}

#[tokio::test]
async fn test_update_with_one_field_succeeds() {
    let uri = format!("/api/services/{}", SERVICE_ID);
    let (status, body) = send("PATCH", &uri, Some(json!({"status": "major_outage"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["params"]["id"], json!(SERVICE_ID));
    assert_eq!(body["data"]["status"], json!("major_outage"));
}

#[tokio::test]
async fn test_maintenance_window_ordering() {
    let (status, body) = send(
        "POST",
        "/api/maintenances",
        Some(json!({
            "title": "Database upgrade",
            "scheduled_start": "2024-01-02T00:00:00Z",
            "scheduled_end": "2024-01-01T00:00:00Z"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"]["scheduled_end"],
        json!("must be later than scheduled_start")
    );

    let (status, body) = send(
        "POST",
        "/api/maintenances",
        Some(json!({
            "title": "Database upgrade",
            "scheduled_start": "2024-01-01T00:00:00Z",
            "scheduled_end": "2024-01-02T00:00:00Z"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], json!("scheduled"));
}

#[tokio::test]
async fn test_organization_slug_pattern() {
    let (status, body) = send(
        "POST",
        "/api/organizations",
        Some(json!({"name": "My Org", "slug": "My Org!"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"]["slug"],
        json!("may only contain lowercase letters, numbers, and hyphens")
    );

    let (status, _) = send(
        "POST",
        "/api/organizations",
        Some(json!({"name": "My Org", "slug": "my-org-2"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_incident_update_entry() {
    let uri = format!("/api/incidents/{}/updates", SERVICE_ID);

    let (status, body) = send(
        "POST",
        &uri,
        Some(json!({"message": "too short", "status": "monitoring"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"]["body.message"],
        json!("must be at least 10 characters")
    );

    let (status, body) = send(
        "POST",
        &uri,
        Some(json!({
            "message": "We have identified the root cause and are deploying a fix.",
            "status": "identified"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["params"]["id"], json!(SERVICE_ID));
}

#[tokio::test]
async fn test_search_query_bounds_and_type_default() {
    let (status, body) = send("GET", "/api/search?q=a", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["q"], json!("must be at least 2 characters"));

    let (status, body) = send("GET", "/api/search?q=database", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["q"], json!("database"));
    assert_eq!(body["data"]["type"], json!("all"));
}

#[tokio::test]
async fn test_public_status_defaults_and_coercion() {
    let (status, body) = send("GET", "/api/status?organization=acme", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["include_services"], json!(true));
    assert_eq!(body["data"]["include_incidents"], json!(true));
    assert_eq!(body["data"]["include_maintenances"], json!(true));
    assert_eq!(body["data"]["days"], json!(7));

    let (status, body) = send(
        "GET",
        "/api/status?organization=acme&include_incidents=false&days=30",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["include_incidents"], json!(false));
    assert_eq!(body["data"]["days"], json!(30));

    let (status, body) = send("GET", "/api/status?days=7", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["organization"], json!("is required"));
}

#[tokio::test]
async fn test_unknown_route_envelope() {
    let (status, body) = send("GET", "/api/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["code"], json!("NOT_FOUND"));
}

#[tokio::test]
async fn test_health_check() {
    let (status, body) = send("GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));
}
