//! Route handlers.
//!
//! Handlers here only ever see sanitized request sections: the validation
//! middleware has already trimmed, coerced, defaulted, and stripped unknown
//! fields before control reaches them. Persistence belongs to the downstream
//! services consuming this gateway, so each handler acknowledges with the
//! sanitized data it received.

use axum::{http::StatusCode, response::IntoResponse, Extension, Json};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Map, Value};

use crate::validation::{SanitizedBody, SanitizedPath, SanitizedQuery};

fn ok(data: Map<String, Value>) -> impl IntoResponse {
    Json(json!({ "success": true, "data": Value::Object(data) }))
}

fn ok_with_path(path: Map<String, Value>, data: Map<String, Value>) -> impl IntoResponse {
    Json(json!({
        "success": true,
        "params": Value::Object(path),
        "data": Value::Object(data)
    }))
}

// ── Services ────────────────────────────────────────────────────────────────

pub async fn list_services(Extension(query): Extension<SanitizedQuery>) -> impl IntoResponse {
    ok(query.0)
}

pub async fn create_service(Extension(body): Extension<SanitizedBody>) -> impl IntoResponse {
    ok(body.0)
}

pub async fn update_service(
    Extension(path): Extension<SanitizedPath>,
    Extension(body): Extension<SanitizedBody>,
) -> impl IntoResponse {
    ok_with_path(path.0, body.0)
}

pub async fn update_service_status(
    Extension(path): Extension<SanitizedPath>,
    Extension(body): Extension<SanitizedBody>,
) -> impl IntoResponse {
    ok_with_path(path.0, body.0)
}

// ── Incidents ───────────────────────────────────────────────────────────────

pub async fn list_incidents(Extension(query): Extension<SanitizedQuery>) -> impl IntoResponse {
    ok(query.0)
}

pub async fn create_incident(Extension(body): Extension<SanitizedBody>) -> impl IntoResponse {
    ok(body.0)
}

pub async fn update_incident(
    Extension(path): Extension<SanitizedPath>,
    Extension(body): Extension<SanitizedBody>,
) -> impl IntoResponse {
    ok_with_path(path.0, body.0)
}

pub async fn post_incident_update(
    Extension(path): Extension<SanitizedPath>,
    Extension(body): Extension<SanitizedBody>,
) -> impl IntoResponse {
    ok_with_path(path.0, body.0)
}

pub async fn resolve_incident(
    Extension(path): Extension<SanitizedPath>,
    Extension(body): Extension<SanitizedBody>,
) -> impl IntoResponse {
    ok_with_path(path.0, body.0)
}

// ── Maintenances ────────────────────────────────────────────────────────────

pub async fn list_maintenances(Extension(query): Extension<SanitizedQuery>) -> impl IntoResponse {
    ok(query.0)
}

pub async fn create_maintenance(Extension(body): Extension<SanitizedBody>) -> impl IntoResponse {
    ok(body.0)
}

pub async fn update_maintenance(
    Extension(path): Extension<SanitizedPath>,
    Extension(body): Extension<SanitizedBody>,
) -> impl IntoResponse {
    ok_with_path(path.0, body.0)
}

// ── Organizations & teams ───────────────────────────────────────────────────

pub async fn create_organization(Extension(body): Extension<SanitizedBody>) -> impl IntoResponse {
    ok(body.0)
}

pub async fn update_organization(
    Extension(path): Extension<SanitizedPath>,
    Extension(body): Extension<SanitizedBody>,
) -> impl IntoResponse {
    ok_with_path(path.0, body.0)
}

pub async fn create_team(Extension(body): Extension<SanitizedBody>) -> impl IntoResponse {
    ok(body.0)
}

pub async fn update_team(
    Extension(path): Extension<SanitizedPath>,
    Extension(body): Extension<SanitizedBody>,
) -> impl IntoResponse {
    ok_with_path(path.0, body.0)
}

pub async fn add_team_member(
    Extension(path): Extension<SanitizedPath>,
    Extension(body): Extension<SanitizedBody>,
) -> impl IntoResponse {
    ok_with_path(path.0, body.0)
}

// ── Search & public status ──────────────────────────────────────────────────

pub async fn search(Extension(query): Extension<SanitizedQuery>) -> impl IntoResponse {
    ok(query.0)
}

pub async fn public_status(Extension(query): Extension<SanitizedQuery>) -> impl IntoResponse {
    ok(query.0)
}

// ── Infrastructure ──────────────────────────────────────────────────────────

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
    }))
}

pub async fn route_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "message": "Route not found",
            "code": "NOT_FOUND"
        })),
    )
}
