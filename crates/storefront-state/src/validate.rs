//! Generic document validation
//!
//! One routine interprets any [`ModelDefinition`]: fields are visited in
//! definition order, defaults are filled, values are type-checked and
//! constrained, nested objects and lists recurse. Every failure is collected
//! so callers get the full report in one pass. Input keys the model does not
//! declare are dropped without complaint.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Number, Value};
use tracing::debug;

use crate::error::{FieldError, FieldErrorKind, ValidationError};
use crate::schema::{Constraint, Document, FieldKind, ModelDefinition, ModelRegistry};

/// Validate `raw` against the model registered as `model_name`.
pub fn validate(
    registry: &ModelRegistry,
    model_name: &str,
    raw: &Value,
) -> Result<Document, ValidationError> {
    match registry.get(model_name) {
        Some(definition) => validate_against(definition, raw),
        None => Err(ValidationError {
            model: model_name.to_string(),
            errors: vec![FieldError::new("", FieldErrorKind::UnknownModel)],
        }),
    }
}

/// Validate `raw` against an explicit definition.
pub fn validate_against(
    definition: &ModelDefinition,
    raw: &Value,
) -> Result<Document, ValidationError> {
    let mut errors = Vec::new();
    let fields = check_object(definition, raw, "", &mut errors);

    match fields {
        Some(fields) if errors.is_empty() => Ok(Document::new(definition.name(), fields)),
        _ => {
            debug!(
                model = definition.name(),
                failures = errors.len(),
                "Validation rejected input"
            );
            Err(ValidationError {
                model: definition.name().to_string(),
                errors,
            })
        }
    }
}

fn child_path(parent: &str, field: &str) -> String {
    if parent.is_empty() {
        field.to_string()
    } else {
        format!("{parent}.{field}")
    }
}

fn check_object(
    definition: &ModelDefinition,
    raw: &Value,
    path: &str,
    errors: &mut Vec<FieldError>,
) -> Option<Map<String, Value>> {
    let Some(input) = raw.as_object() else {
        errors.push(FieldError::new(
            path,
            FieldErrorKind::WrongType { expected: "object" },
        ));
        return None;
    };

    let mut out = Map::new();
    for spec in definition.fields() {
        let field_path = child_path(path, &spec.name);
        match input.get(&spec.name) {
            None => match &spec.default {
                Some(default) => {
                    out.insert(spec.name.clone(), default.produce());
                }
                None => errors.push(FieldError::new(field_path, FieldErrorKind::Missing)),
            },
            Some(Value::Null) if spec.nullable => {
                out.insert(spec.name.clone(), Value::Null);
            }
            Some(value) => {
                if let Some(checked) =
                    check_value(&spec.kind, &spec.constraints, value, &field_path, errors)
                {
                    out.insert(spec.name.clone(), checked);
                }
            }
        }
    }
    Some(out)
}

fn check_value(
    kind: &FieldKind,
    constraints: &[Constraint],
    value: &Value,
    path: &str,
    errors: &mut Vec<FieldError>,
) -> Option<Value> {
    let wrong_type = |errors: &mut Vec<FieldError>| {
        errors.push(FieldError::new(
            path,
            FieldErrorKind::WrongType {
                expected: kind.expected(),
            },
        ));
    };

    match kind {
        FieldKind::String => {
            let Some(s) = value.as_str() else {
                wrong_type(errors);
                return None;
            };
            check_string(s, constraints, path, errors);
            Some(Value::String(s.to_string()))
        }
        FieldKind::Integer => {
            let Some(n) = coerce_integer(value) else {
                wrong_type(errors);
                return None;
            };
            check_bounds(n as f64, constraints, path, errors);
            Some(Value::from(n))
        }
        FieldKind::Number => {
            let Some(n) = coerce_number(value) else {
                wrong_type(errors);
                return None;
            };
            check_bounds(n, constraints, path, errors);
            Number::from_f64(n).map(Value::Number)
        }
        FieldKind::Boolean => match value {
            Value::Bool(b) => Some(Value::Bool(*b)),
            Value::String(s) if s == "true" => Some(Value::Bool(true)),
            Value::String(s) if s == "false" => Some(Value::Bool(false)),
            _ => {
                wrong_type(errors);
                None
            }
        },
        FieldKind::List(element) => {
            let Some(items) = value.as_array() else {
                wrong_type(errors);
                return None;
            };
            let mut out = Vec::with_capacity(items.len());
            for (idx, item) in items.iter().enumerate() {
                let item_path = format!("{path}[{idx}]");
                if let Some(checked) = check_value(element, &[], item, &item_path, errors) {
                    out.push(checked);
                }
            }
            Some(Value::Array(out))
        }
        FieldKind::Object(nested) => check_object(nested, value, path, errors).map(Value::Object),
    }
}

fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

fn check_bounds(n: f64, constraints: &[Constraint], path: &str, errors: &mut Vec<FieldError>) {
    for constraint in constraints {
        match constraint {
            Constraint::Minimum(minimum) if n < *minimum => errors.push(FieldError::new(
                path,
                FieldErrorKind::BelowMinimum { minimum: *minimum },
            )),
            Constraint::Maximum(maximum) if n > *maximum => errors.push(FieldError::new(
                path,
                FieldErrorKind::AboveMaximum { maximum: *maximum },
            )),
            _ => {}
        }
    }
}

fn check_string(s: &str, constraints: &[Constraint], path: &str, errors: &mut Vec<FieldError>) {
    for constraint in constraints {
        match constraint {
            Constraint::Email if !is_email(s) => errors.push(FieldError::new(
                path,
                FieldErrorKind::InvalidFormat { format: "email" },
            )),
            Constraint::OneOf(allowed) if !allowed.iter().any(|a| a == s) => {
                errors.push(FieldError::new(
                    path,
                    FieldErrorKind::NotAllowed {
                        allowed: allowed.clone(),
                    },
                ))
            }
            _ => {}
        }
    }
}

static EMAIL_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();

/// Syntactic shape only: `local@domain.tld`, no whitespace, one `@`.
fn is_email(s: &str) -> bool {
    EMAIL_PATTERN
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(s))
}
