//! The validation engine: schema + raw input in, sanitized value or a
//! complete violation map out.
//!
//! Evaluation never stops at the first failure. Every declared field is
//! checked so API consumers see all problems in one round trip; within a
//! single field the first violated rule wins.

use std::collections::BTreeMap;

use chrono::DateTime;
use serde_json::{Map, Value};

use super::schema::Schema;

/// Synthetic key used for violations that belong to the schema as a whole
/// rather than to a single field.
pub const SCHEMA_ERROR_KEY: &str = "_schema";

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// Coerced, trimmed, defaulted output containing only declared fields.
    Sanitized(Map<String, Value>),
    /// One message per violated field path. Never empty.
    Failure(BTreeMap<String, String>),
}

impl ValidationOutcome {
    pub fn is_sanitized(&self) -> bool {
        matches!(self, ValidationOutcome::Sanitized(_))
    }
}

/// Validate `raw` against `schema`.
///
/// `Null` input is treated as an empty object so that absent request bodies
/// flow through the same required/default handling as `{}`.
pub fn validate(schema: &Schema, raw: &Value) -> ValidationOutcome {
    let empty = Map::new();
    let input = match raw {
        Value::Object(map) => map,
        Value::Null => &empty,
        _ => {
            let mut errors = BTreeMap::new();
            errors.insert(
                SCHEMA_ERROR_KEY.to_string(),
                "payload must be a JSON object".to_string(),
            );
            return ValidationOutcome::Failure(errors);
        }
    };

    let mut errors: BTreeMap<String, String> = BTreeMap::new();
    let mut sanitized = Map::new();
    let mut present_valid = 0usize;

    for field in schema.fields() {
        match input.get(field.name) {
            Some(value) => match field.constraint.evaluate(value) {
                Ok(clean) => {
                    sanitized.insert(field.name.to_string(), clean);
                    present_valid += 1;
                }
                Err(message) => {
                    errors.insert(field.name.to_string(), message);
                }
            },
            None => {
                if let Some(ref default) = field.constraint.default {
                    sanitized.insert(field.name.to_string(), default.clone());
                } else if field.constraint.required {
                    errors.insert(field.name.to_string(), "is required".to_string());
                }
            }
        }
    }

    // Schema-level rules run after the per-field pass, over fields that
    // passed on their own.
    let min_present = schema.min_present_fields();
    if min_present > 0 && present_valid < min_present {
        let message = if min_present == 1 {
            "at least one field is required".to_string()
        } else {
            format!("at least {} fields are required", min_present)
        };
        errors.insert(SCHEMA_ERROR_KEY.to_string(), message);
    }

    for field in schema.fields() {
        let Some(reference) = field.constraint.after_field() else {
            continue;
        };
        if errors.contains_key(field.name) {
            continue;
        }
        let (Some(Value::String(end)), Some(Value::String(start))) =
            (sanitized.get(field.name), sanitized.get(reference))
        else {
            continue;
        };
        if let (Ok(end_ts), Ok(start_ts)) = (
            DateTime::parse_from_rfc3339(end),
            DateTime::parse_from_rfc3339(start),
        ) {
            if end_ts <= start_ts {
                errors.insert(
                    field.name.to_string(),
                    format!("must be later than {}", reference),
                );
            }
        }
    }

    if errors.is_empty() {
        ValidationOutcome::Sanitized(sanitized)
    } else {
        ValidationOutcome::Failure(errors)
    }
}
