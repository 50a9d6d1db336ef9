//! Error types for storefront-state

use std::fmt;

use thiserror::Error;

/// Errors raised while building a model registry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A model with the same name is already registered
    #[error("Model already registered: {0}")]
    DuplicateModel(String),

    /// A model declares the same field twice
    #[error("Duplicate field `{field}` in model {model}")]
    DuplicateField { model: String, field: String },
}

/// Errors returned by a [`crate::DocumentStore`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No live database connection exists
    #[error("Document store unavailable")]
    Unavailable,

    /// The driver failed while talking to the database
    #[error("Document store I/O failed: {0}")]
    Io(String),
}

impl From<surrealdb::Error> for StoreError {
    fn from(err: surrealdb::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

/// The constraint a single field failed
#[derive(Debug, Clone, PartialEq)]
pub enum FieldErrorKind {
    /// Required field absent from the input
    Missing,
    /// Value has the wrong JSON type
    WrongType { expected: &'static str },
    /// Numeric value below the inclusive lower bound
    BelowMinimum { minimum: f64 },
    /// Numeric value above the inclusive upper bound
    AboveMaximum { maximum: f64 },
    /// String does not match the declared format
    InvalidFormat { format: &'static str },
    /// String is not one of the allowed values
    NotAllowed { allowed: Vec<String> },
    /// No model with this name is registered
    UnknownModel,
}

impl FieldErrorKind {
    /// Short machine-readable code for the failure
    pub fn code(&self) -> &'static str {
        match self {
            FieldErrorKind::Missing => "missing",
            FieldErrorKind::WrongType { .. } => "wrong_type",
            FieldErrorKind::BelowMinimum { .. } => "below_minimum",
            FieldErrorKind::AboveMaximum { .. } => "above_maximum",
            FieldErrorKind::InvalidFormat { .. } => "invalid_format",
            FieldErrorKind::NotAllowed { .. } => "not_allowed",
            FieldErrorKind::UnknownModel => "unknown_model",
        }
    }
}

impl fmt::Display for FieldErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldErrorKind::Missing => write!(f, "field required"),
            FieldErrorKind::WrongType { expected } => write!(f, "expected {expected}"),
            FieldErrorKind::BelowMinimum { minimum } => {
                write!(f, "must be greater than or equal to {minimum}")
            }
            FieldErrorKind::AboveMaximum { maximum } => {
                write!(f, "must be less than or equal to {maximum}")
            }
            FieldErrorKind::InvalidFormat { format } => write!(f, "not a valid {format}"),
            FieldErrorKind::NotAllowed { allowed } => {
                write!(f, "must be one of: {}", allowed.join(", "))
            }
            FieldErrorKind::UnknownModel => write!(f, "unknown model"),
        }
    }
}

/// One failing field, addressed by its path inside the input
/// (`customer_email`, `items[0].quantity`; empty for the root).
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{path}: {kind}")]
pub struct FieldError {
    pub path: String,
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(path: impl Into<String>, kind: FieldErrorKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Every field failure found while validating one input
#[derive(Error, Debug, Clone, PartialEq)]
#[error("validation failed for {model}: {}", summarize(.errors))]
pub struct ValidationError {
    pub model: String,
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// True when some failure is reported at exactly `path`
    pub fn has_path(&self, path: &str) -> bool {
        self.errors.iter().any(|e| e.path == path)
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
