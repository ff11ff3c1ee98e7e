//! Single-field constraint primitives.
//!
//! Each constraint is plain data: a tagged [`ConstraintKind`] carrying its
//! bounds, plus the required/default flags. [`Constraint::evaluate`] is the
//! one dispatch point that turns a raw JSON value into either a coerced,
//! sanitized value or a violation message.

use chrono::DateTime;
use regex::Regex;
use serde_json::{Number, Value};
use uuid::Uuid;

use super::sanitizers;

/// A compiled pattern paired with the message reported when it does not match.
#[derive(Debug, Clone)]
pub struct Pattern {
    pub regex: Regex,
    pub message: &'static str,
}

/// Rules for string fields. Lengths are character counts, checked after
/// trimming and control-character removal.
#[derive(Debug, Clone)]
pub struct StringRule {
    pub min: usize,
    pub max: usize,
    pub pattern: Option<Pattern>,
    /// Accept `null` or `""` as a valid value, bypassing the other checks.
    pub allow_empty: bool,
    /// Refuse values containing HTML tags.
    pub reject_html: bool,
}

/// Rules for numeric fields. Bounds are inclusive.
#[derive(Debug, Clone)]
pub struct NumberRule {
    pub integer: bool,
    pub min: f64,
    pub max: f64,
}

/// The tagged constraint variants the engine dispatches over.
#[derive(Debug, Clone)]
pub enum ConstraintKind {
    String(StringRule),
    Number(NumberRule),
    Boolean,
    Date {
        /// Name of a sibling date field this value must be strictly later
        /// than. Checked by the engine once both fields pass on their own.
        after: Option<&'static str>,
    },
    Enum {
        allowed: &'static [&'static str],
    },
    Uuid,
}

impl ConstraintKind {
    pub fn text(min: usize, max: usize) -> Self {
        ConstraintKind::String(StringRule {
            min,
            max,
            pattern: None,
            allow_empty: false,
            reject_html: false,
        })
    }

    /// Text that additionally refuses HTML tags (titles, names, messages).
    pub fn text_no_html(min: usize, max: usize) -> Self {
        ConstraintKind::String(StringRule {
            min,
            max,
            pattern: None,
            allow_empty: false,
            reject_html: true,
        })
    }

    /// Text that also accepts `null` or the empty string as-is.
    pub fn nullable_text(min: usize, max: usize) -> Self {
        ConstraintKind::String(StringRule {
            min,
            max,
            pattern: None,
            allow_empty: true,
            reject_html: true,
        })
    }

    pub fn matching(min: usize, max: usize, regex: Regex, message: &'static str) -> Self {
        ConstraintKind::String(StringRule {
            min,
            max,
            pattern: Some(Pattern { regex, message }),
            allow_empty: false,
            reject_html: false,
        })
    }

    pub fn integer(min: i64, max: i64) -> Self {
        ConstraintKind::Number(NumberRule {
            integer: true,
            min: min as f64,
            max: max as f64,
        })
    }

    pub fn date() -> Self {
        ConstraintKind::Date { after: None }
    }

    pub fn date_after(field: &'static str) -> Self {
        ConstraintKind::Date {
            after: Some(field),
        }
    }

    pub fn one_of(allowed: &'static [&'static str]) -> Self {
        ConstraintKind::Enum { allowed }
    }

    pub fn uuid() -> Self {
        ConstraintKind::Uuid
    }
}

/// A validation + coercion rule for one field.
#[derive(Debug, Clone)]
pub struct Constraint {
    pub kind: ConstraintKind,
    pub required: bool,
    pub default: Option<Value>,
}

impl Constraint {
    pub fn optional(kind: ConstraintKind) -> Self {
        Self {
            kind,
            required: false,
            default: None,
        }
    }

    pub fn required(kind: ConstraintKind) -> Self {
        Self {
            kind,
            required: true,
            default: None,
        }
    }

    pub fn with_default(kind: ConstraintKind, default: Value) -> Self {
        Self {
            kind,
            required: false,
            default: Some(default),
        }
    }

    /// The sibling field this constraint must exceed, if any.
    pub fn after_field(&self) -> Option<&'static str> {
        match self.kind {
            ConstraintKind::Date { after } => after,
            _ => None,
        }
    }

    /// Evaluate a present raw value against this constraint, returning the
    /// coerced value or the first violated rule's message.
    pub fn evaluate(&self, raw: &Value) -> Result<Value, String> {
        match &self.kind {
            ConstraintKind::String(rule) => evaluate_string(rule, raw),
            ConstraintKind::Number(rule) => evaluate_number(rule, raw),
            ConstraintKind::Boolean => evaluate_boolean(raw),
            ConstraintKind::Date { .. } => evaluate_date(raw),
            ConstraintKind::Enum { allowed } => evaluate_enum(allowed, raw),
            ConstraintKind::Uuid => evaluate_uuid(raw),
        }
    }
}

fn evaluate_string(rule: &StringRule, raw: &Value) -> Result<Value, String> {
    let s = match raw {
        Value::String(s) => s,
        Value::Null if rule.allow_empty => return Ok(Value::Null),
        Value::Null => return Err("must not be null".to_string()),
        _ => return Err("must be a string".to_string()),
    };

    let cleaned = sanitizers::clean_text(s);
    if cleaned.is_empty() && rule.allow_empty {
        return Ok(Value::String(cleaned));
    }

    let len = cleaned.chars().count();
    if len < rule.min {
        return Err(format!("must be at least {} characters", rule.min));
    }
    if len > rule.max {
        return Err(format!("must be at most {} characters", rule.max));
    }
    if let Some(ref pattern) = rule.pattern {
        if !pattern.regex.is_match(&cleaned) {
            return Err(pattern.message.to_string());
        }
    }
    if rule.reject_html && sanitizers::contains_html(&cleaned) {
        return Err("must not contain HTML".to_string());
    }

    Ok(Value::String(cleaned))
}

fn evaluate_number(rule: &NumberRule, raw: &Value) -> Result<Value, String> {
    let n = match raw {
        Value::Number(num) => num.as_f64().ok_or_else(|| "must be a number".to_string())?,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| "must be a number".to_string())?,
        _ => return Err("must be a number".to_string()),
    };
    if !n.is_finite() {
        return Err("must be a number".to_string());
    }

    if rule.integer && n.fract() != 0.0 {
        return Err("must be an integer".to_string());
    }
    if n < rule.min {
        return Err(format!("must be at least {}", rule.min));
    }
    if n > rule.max {
        return Err(format!("must be at most {}", rule.max));
    }

    if rule.integer {
        Ok(Value::Number(Number::from(n as i64)))
    } else {
        Number::from_f64(n)
            .map(Value::Number)
            .ok_or_else(|| "must be a number".to_string())
    }
}

fn evaluate_boolean(raw: &Value) -> Result<Value, String> {
    match raw {
        Value::Bool(b) => Ok(Value::Bool(*b)),
        Value::String(s) => match s.trim() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err("must be a boolean".to_string()),
        },
        _ => Err("must be a boolean".to_string()),
    }
}

fn evaluate_date(raw: &Value) -> Result<Value, String> {
    let s = match raw {
        Value::String(s) => s.trim(),
        _ => return Err("must be a valid ISO-8601 timestamp".to_string()),
    };

    DateTime::parse_from_rfc3339(s).map_err(|_| "must be a valid ISO-8601 timestamp".to_string())?;
    Ok(Value::String(s.to_string()))
}

fn evaluate_enum(allowed: &[&str], raw: &Value) -> Result<Value, String> {
    let s = match raw {
        Value::String(s) => s.trim(),
        _ => return Err(format!("must be one of: {}", allowed.join(", "))),
    };

    if allowed.contains(&s) {
        Ok(Value::String(s.to_string()))
    } else {
        Err(format!("must be one of: {}", allowed.join(", ")))
    }
}

fn evaluate_uuid(raw: &Value) -> Result<Value, String> {
    let s = match raw {
        Value::String(s) => s.trim(),
        _ => return Err("must be a valid UUID".to_string()),
    };

    // Canonical hyphenated form only; Uuid::parse_str also accepts the
    // simple and braced renderings, so the length check pins it down.
    if s.len() == 36 {
        if let Ok(parsed) = Uuid::parse_str(s) {
            return Ok(Value::String(parsed.to_string()));
        }
    }
    Err("must be a valid UUID".to_string())
}
