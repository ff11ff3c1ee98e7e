//! Named, immutable field-constraint schemas.
//!
//! A [`Schema`] is built once at startup and shared read-only across
//! concurrent request validations. Configuration defects (duplicate fields,
//! a default on a required field, a cross-field reference to an undeclared
//! field) are caught here, at construction time, never at request time.

use thiserror::Error;

use super::constraint::Constraint;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema `{schema}` declares field `{field}` more than once")]
    DuplicateField {
        schema: &'static str,
        field: &'static str,
    },

    #[error("schema `{schema}`: field `{field}` is required and cannot carry a default")]
    DefaultOnRequired {
        schema: &'static str,
        field: &'static str,
    },

    #[error("schema `{schema}`: field `{field}` references undeclared field `{reference}`")]
    UnknownReference {
        schema: &'static str,
        field: &'static str,
        reference: &'static str,
    },

    #[error("schema `{schema}`: default for field `{field}` is invalid: {message}")]
    InvalidDefault {
        schema: &'static str,
        field: &'static str,
        message: String,
    },
}

/// One named field and its constraint.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    pub constraint: Constraint,
}

/// Shorthand used by the schema catalogue.
pub fn field(name: &'static str, constraint: Constraint) -> Field {
    Field { name, constraint }
}

/// An ordered set of per-field constraints plus schema-level rules.
#[derive(Debug, Clone)]
pub struct Schema {
    name: &'static str,
    fields: Vec<Field>,
    min_present_fields: usize,
}

impl Schema {
    pub fn new(name: &'static str, fields: Vec<Field>) -> Result<Self, SchemaError> {
        Self::with_min_present(name, fields, 0)
    }

    /// Build a schema that additionally requires at least `min_present_fields`
    /// of its fields to be present (and valid) in the input. Used by update
    /// schemas where an empty payload is itself a violation.
    pub fn with_min_present(
        name: &'static str,
        fields: Vec<Field>,
        min_present_fields: usize,
    ) -> Result<Self, SchemaError> {
        for (i, field) in fields.iter().enumerate() {
            if fields[..i].iter().any(|f| f.name == field.name) {
                return Err(SchemaError::DuplicateField {
                    schema: name,
                    field: field.name,
                });
            }

            if field.constraint.required && field.constraint.default.is_some() {
                return Err(SchemaError::DefaultOnRequired {
                    schema: name,
                    field: field.name,
                });
            }

            if let Some(reference) = field.constraint.after_field() {
                if !fields.iter().any(|f| f.name == reference) {
                    return Err(SchemaError::UnknownReference {
                        schema: name,
                        field: field.name,
                        reference,
                    });
                }
            }

            if let Some(ref default) = field.constraint.default {
                if let Err(message) = field.constraint.evaluate(default) {
                    return Err(SchemaError::InvalidDefault {
                        schema: name,
                        field: field.name,
                        message,
                    });
                }
            }
        }

        Ok(Self {
            name,
            fields,
            min_present_fields,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn min_present_fields(&self) -> usize {
        self.min_present_fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::constraint::ConstraintKind;
    use serde_json::json;

    #[test]
    fn test_valid_schema_builds() {
        let schema = Schema::new(
            "test.create",
            vec![
                field("name", Constraint::required(ConstraintKind::text(1, 10))),
                field(
                    "page",
                    Constraint::with_default(ConstraintKind::integer(1, 100), json!(1)),
                ),
            ],
        )
        .unwrap();

        assert_eq!(schema.name(), "test.create");
        assert_eq!(schema.fields().len(), 2);
        assert_eq!(schema.min_present_fields(), 0);
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let result = Schema::new(
            "test",
            vec![
                field("name", Constraint::required(ConstraintKind::text(1, 10))),
                field("name", Constraint::optional(ConstraintKind::text(1, 10))),
            ],
        );

        assert!(matches!(
            result,
            Err(SchemaError::DuplicateField { field: "name", .. })
        ));
    }

    #[test]
    fn test_default_on_required_rejected() {
        let constraint = Constraint {
            kind: ConstraintKind::text(1, 10),
            required: true,
            default: Some(json!("x")),
        };
        let result = Schema::new("test", vec![field("name", constraint)]);

        assert!(matches!(
            result,
            Err(SchemaError::DefaultOnRequired { field: "name", .. })
        ));
    }

    #[test]
    fn test_unknown_cross_field_reference_rejected() {
        let result = Schema::new(
            "test",
            vec![field(
                "end",
                Constraint::required(ConstraintKind::date_after("start")),
            )],
        );

        assert!(matches!(
            result,
            Err(SchemaError::UnknownReference {
                field: "end",
                reference: "start",
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_default_rejected() {
        let result = Schema::new(
            "test",
            vec![field(
                "limit",
                Constraint::with_default(ConstraintKind::integer(1, 100), json!(500)),
            )],
        );

        assert!(matches!(result, Err(SchemaError::InvalidDefault { .. })));
    }
}
