//! Request validation and sanitization.
//!
//! The validation system has four layers:
//!
//! 1. **Constraint primitives** ([`constraint`]) - tagged per-field rules
//!    (string, number, boolean, date, enum, UUID) with bounds, patterns,
//!    defaults, and coercion, evaluated by one dispatch function.
//! 2. **Schemas** ([`schema`], [`schemas`]) - immutable named field sets per
//!    (resource, operation), with schema-level rules such as "an update must
//!    touch at least one field" and cross-field date ordering. The full
//!    catalogue is built once at startup by [`SchemaCatalogue::new`].
//! 3. **Engine** ([`engine`]) - exhaustive evaluation producing either a
//!    sanitized value (trimmed, coerced, defaulted, unknown fields stripped)
//!    or one message per violated field.
//! 4. **Middleware** ([`middleware`]) - axum adapters that validate the
//!    body, query, and path sections of a request, write the sanitized
//!    values back, and reject with a fixed envelope on failure:
//!
//! ```json
//! {
//!   "success": false,
//!   "message": "Validation failed",
//!   "code": "VALIDATION_ERROR",
//!   "errors": { "scheduled_end": "must be later than scheduled_start" }
//! }
//! ```
//!
//! When several sections are validated in one pass, every section is
//! evaluated and all violations are merged into one response, with keys
//! prefixed by section (`body.name`, `query.limit`).

pub mod constraint;
pub mod engine;
pub mod middleware;
pub mod sanitizers;
pub mod schema;
pub mod schemas;

pub use constraint::{Constraint, ConstraintKind};
pub use engine::{validate, ValidationOutcome, SCHEMA_ERROR_KEY};
pub use middleware::{
    validate_request, SanitizedBody, SanitizedPath, SanitizedQuery, SectionSchema, Target,
    ValidationConfig, ValidationRejection,
};
pub use schema::{field, Field, Schema, SchemaError};
pub use schemas::SchemaCatalogue;
