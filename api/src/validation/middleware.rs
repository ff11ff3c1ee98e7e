//! Request-pipeline adapters for the validation engine.
//!
//! A [`ValidationConfig`] names which request sections (body, query, path
//! parameters) to validate and against which schemas. Attach it with
//! `axum::middleware::from_fn_with_state`:
//!
//! ```ignore
//! route.layer(middleware::from_fn_with_state(
//!     ValidationConfig::body(&catalogue.service_create),
//!     validate_request,
//! ))
//! ```
//!
//! On success the sanitized body is written back into the request (and all
//! sections are exposed as [`SanitizedBody`] / [`SanitizedQuery`] /
//! [`SanitizedPath`] extensions) before the downstream handler runs. On
//! failure the pipeline halts with a 400 response carrying every violation
//! found across all configured sections.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body, Bytes},
    extract::{FromRequestParts, RawPathParams, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};

use super::engine::{self, ValidationOutcome};
use super::schema::Schema;

/// Cap on request bodies the body-section adapter will buffer.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Which section of the request a validation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Body,
    Query,
    Path,
}

impl Target {
    pub fn label(&self) -> &'static str {
        match self {
            Target::Body => "body",
            Target::Query => "query",
            Target::Path => "path",
        }
    }
}

/// One (section, schema) pair.
#[derive(Debug, Clone)]
pub struct SectionSchema {
    pub target: Target,
    pub schema: Arc<Schema>,
}

impl SectionSchema {
    pub fn new(target: Target, schema: Arc<Schema>) -> Self {
        Self { target, schema }
    }
}

/// Per-route validation configuration, built once at router construction.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    sections: Arc<Vec<SectionSchema>>,
}

impl ValidationConfig {
    pub fn body(schema: &Arc<Schema>) -> Self {
        Self::sections(vec![SectionSchema::new(Target::Body, schema.clone())])
    }

    pub fn query(schema: &Arc<Schema>) -> Self {
        Self::sections(vec![SectionSchema::new(Target::Query, schema.clone())])
    }

    pub fn path(schema: &Arc<Schema>) -> Self {
        Self::sections(vec![SectionSchema::new(Target::Path, schema.clone())])
    }

    pub fn sections(sections: Vec<SectionSchema>) -> Self {
        Self {
            sections: Arc::new(sections),
        }
    }

    /// Violation keys are prefixed with the section label only when more
    /// than one section is being validated in the same pass.
    fn prefixed(&self) -> bool {
        self.sections.len() > 1
    }
}

/// Sanitized JSON body, inserted by the adapter for downstream handlers.
#[derive(Debug, Clone)]
pub struct SanitizedBody(pub Map<String, Value>);

/// Sanitized query parameters (coerced and defaulted).
#[derive(Debug, Clone)]
pub struct SanitizedQuery(pub Map<String, Value>);

/// Sanitized path parameters.
#[derive(Debug, Clone)]
pub struct SanitizedPath(pub Map<String, Value>);

impl std::ops::Deref for SanitizedBody {
    type Target = Map<String, Value>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::Deref for SanitizedQuery {
    type Target = Map<String, Value>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::Deref for SanitizedPath {
    type Target = Map<String, Value>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// The fixed failure envelope, emitted with status 400.
#[derive(Debug, Serialize)]
pub struct ValidationRejection {
    success: bool,
    message: &'static str,
    code: &'static str,
    errors: BTreeMap<String, String>,
}

impl ValidationRejection {
    pub fn new(errors: BTreeMap<String, String>) -> Self {
        Self {
            success: false,
            message: "Validation failed",
            code: "VALIDATION_ERROR",
            errors,
        }
    }
}

impl IntoResponse for ValidationRejection {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

/// Middleware entry point: validates every configured section, writes the
/// sanitized values back, and either forwards the request or rejects it with
/// all violations merged into one response.
pub async fn validate_request(
    State(config): State<ValidationConfig>,
    req: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();

    let mut errors: BTreeMap<String, String> = BTreeMap::new();
    let mut original_body = Some(body);
    let mut replacement_body: Option<Bytes> = None;

    for section in config.sections.iter() {
        let prefix = config.prefixed().then(|| section.target.label());

        match section.target {
            Target::Body => {
                let Some(body) = original_body.take() else {
                    continue;
                };
                let bytes = match to_bytes(body, MAX_BODY_BYTES).await {
                    Ok(bytes) => bytes,
                    Err(_) => {
                        errors.insert(
                            "body".to_string(),
                            "request body could not be read or exceeds the size limit".to_string(),
                        );
                        continue;
                    }
                };
                let raw: Value = if bytes.is_empty() {
                    Value::Object(Map::new())
                } else {
                    match serde_json::from_slice(&bytes) {
                        Ok(value) => value,
                        Err(_) => {
                            errors.insert("body".to_string(), "must be valid JSON".to_string());
                            continue;
                        }
                    }
                };

                match engine::validate(&section.schema, &raw) {
                    ValidationOutcome::Sanitized(map) => {
                        // Downstream consumers only ever see the sanitized body.
                        if let Ok(encoded) = serde_json::to_vec(&Value::Object(map.clone())) {
                            replacement_body = Some(Bytes::from(encoded));
                        }
                        parts.extensions.insert(SanitizedBody(map));
                    }
                    ValidationOutcome::Failure(violations) => {
                        merge_violations(&mut errors, violations, prefix);
                    }
                }
            }
            Target::Query => {
                let raw = query_to_value(parts.uri.query().unwrap_or(""));
                match engine::validate(&section.schema, &raw) {
                    ValidationOutcome::Sanitized(map) => {
                        parts.extensions.insert(SanitizedQuery(map));
                    }
                    ValidationOutcome::Failure(violations) => {
                        merge_violations(&mut errors, violations, prefix);
                    }
                }
            }
            Target::Path => {
                let raw = path_params_to_value(&mut parts).await;
                match engine::validate(&section.schema, &raw) {
                    ValidationOutcome::Sanitized(map) => {
                        parts.extensions.insert(SanitizedPath(map));
                    }
                    ValidationOutcome::Failure(violations) => {
                        merge_violations(&mut errors, violations, prefix);
                    }
                }
            }
        }
    }

    if !errors.is_empty() {
        tracing::debug!("request validation failed for {} field(s)", errors.len());
        return ValidationRejection::new(errors).into_response();
    }

    let body = match replacement_body {
        Some(bytes) => Body::from(bytes),
        None => original_body.take().unwrap_or_else(Body::empty),
    };
    next.run(Request::from_parts(parts, body)).await
}

fn merge_violations(
    errors: &mut BTreeMap<String, String>,
    violations: BTreeMap<String, String>,
    prefix: Option<&'static str>,
) {
    for (key, message) in violations {
        let key = match prefix {
            Some(p) => format!("{}.{}", p, key),
            None => key,
        };
        errors.entry(key).or_insert(message);
    }
}

fn query_to_value(query: &str) -> Value {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).unwrap_or_default();
    let mut map = Map::new();
    for (key, value) in pairs {
        // Last occurrence of a repeated key wins
        map.insert(key, Value::String(value));
    }
    Value::Object(map)
}

async fn path_params_to_value(parts: &mut Parts) -> Value {
    let mut map = Map::new();
    if let Ok(params) = RawPathParams::from_request_parts(parts, &()).await {
        for (key, value) in &params {
            map.insert(key.to_string(), Value::String(value.to_string()));
        }
    }
    Value::Object(map)
}
