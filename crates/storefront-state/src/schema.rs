//! Model definitions and the model registry
//!
//! A [`ModelDefinition`] is plain data: a name plus an ordered list of
//! [`FieldSpec`]s. Definitions are registered once at startup in a
//! [`ModelRegistry`] and interpreted by the generic validator in
//! [`crate::validate`].

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SchemaError;

/// Document as read back from the store, internal identifier included.
pub type RawDocument = Map<String, Value>;

/// Derive the storage collection name for a model.
///
/// The rule is plain lower-casing: `Product` -> `product`,
/// `DesignRequest` -> `designrequest`. There is no pluralisation.
pub fn collection_name_for(model_name: &str) -> String {
    model_name.to_lowercase()
}

/// Semantic type of a field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    String,
    Integer,
    /// Any number; stored as a float
    Number,
    Boolean,
    /// Ordered sequence whose elements share one kind
    List(Box<FieldKind>),
    /// Nested object with its own schema
    Object(ModelDefinition),
}

impl FieldKind {
    /// List of `element`
    pub fn list_of(element: FieldKind) -> Self {
        FieldKind::List(Box::new(element))
    }

    pub(crate) fn expected(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::List(_) => "list",
            FieldKind::Object(_) => "object",
        }
    }
}

/// Validation constraint attached to a field
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Inclusive lower bound
    Minimum(f64),
    /// Inclusive upper bound
    Maximum(f64),
    /// Syntactic e-mail address shape
    Email,
    /// Value must be one of these strings
    OneOf(Vec<String>),
}

/// Value substituted when an optional field is absent
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// Literal, cloned into every document
    Literal(Value),
    /// Fresh empty list built per document
    EmptyList,
    /// Fresh empty object built per document
    EmptyObject,
}

impl DefaultValue {
    /// Build the value for one document.
    pub fn produce(&self) -> Value {
        match self {
            DefaultValue::Literal(value) => value.clone(),
            DefaultValue::EmptyList => Value::Array(Vec::new()),
            DefaultValue::EmptyObject => Value::Object(Map::new()),
        }
    }
}

/// One field of a model
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    /// `null` is an accepted value
    pub nullable: bool,
    /// `None` means the field is required
    pub default: Option<DefaultValue>,
    pub constraints: Vec<Constraint>,
    pub description: Option<String>,
}

impl FieldSpec {
    /// A required, non-nullable field.
    pub fn required(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: false,
            default: None,
            constraints: Vec::new(),
            description: None,
        }
    }

    /// An optional field that defaults to `null`.
    pub fn optional(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            nullable: true,
            default: Some(DefaultValue::Literal(Value::Null)),
            ..Self::required(name, kind)
        }
    }

    /// Substitute `value` when the field is absent.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Literal(value.into()));
        self
    }

    /// Substitute a fresh empty container when the field is absent.
    pub fn with_empty_default(mut self) -> Self {
        self.default = Some(match self.kind {
            FieldKind::Object(_) => DefaultValue::EmptyObject,
            _ => DefaultValue::EmptyList,
        });
        self
    }

    pub fn minimum(mut self, bound: f64) -> Self {
        self.constraints.push(Constraint::Minimum(bound));
        self
    }

    pub fn maximum(mut self, bound: f64) -> Self {
        self.constraints.push(Constraint::Maximum(bound));
        self
    }

    pub fn email(mut self) -> Self {
        self.constraints.push(Constraint::Email);
        self
    }

    pub fn one_of<I, S>(mut self, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constraints
            .push(Constraint::OneOf(allowed.into_iter().map(Into::into).collect()));
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// True when absence is an error
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// A named, ordered set of field specifications
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDefinition {
    name: String,
    fields: Vec<FieldSpec>,
}

impl ModelDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field. Order of calls is definition order.
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn collection_name(&self) -> String {
        collection_name_for(&self.name)
    }

    fn check_unique_fields(&self) -> Result<(), SchemaError> {
        let mut seen = std::collections::HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    model: self.name.clone(),
                    field: field.name.clone(),
                });
            }
            if let FieldKind::Object(nested) = &field.kind {
                nested.check_unique_fields()?;
            }
        }
        Ok(())
    }
}

/// Immutable-after-startup set of model definitions, keyed by model name
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: Vec<ModelDefinition>,
    by_name: BTreeMap<String, usize>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition. Names and field names must be unique.
    pub fn register(&mut self, definition: ModelDefinition) -> Result<(), SchemaError> {
        if self.by_name.contains_key(definition.name()) {
            return Err(SchemaError::DuplicateModel(definition.name().to_string()));
        }
        definition.check_unique_fields()?;
        self.by_name
            .insert(definition.name().to_string(), self.models.len());
        self.models.push(definition);
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, definition: ModelDefinition) -> Result<Self, SchemaError> {
        self.register(definition)?;
        Ok(self)
    }

    pub fn get(&self, model_name: &str) -> Option<&ModelDefinition> {
        self.by_name.get(model_name).map(|&idx| &self.models[idx])
    }

    /// Definitions in registration order
    pub fn models(&self) -> impl Iterator<Item = &ModelDefinition> {
        self.models.iter()
    }

    /// Collection for a registered model, `None` when unregistered
    pub fn collection_for(&self, model_name: &str) -> Option<String> {
        self.get(model_name).map(ModelDefinition::collection_name)
    }
}

/// Store-assigned document identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(String);

impl DocumentId {
    /// Fresh time-ordered identifier; later ids sort after earlier ones.
    ///
    /// Layout: 12 hex digits of Unix milliseconds, 8 hex digits of a
    /// process-wide sequence, 12 random hex digits.
    pub(crate) fn generate() -> Self {
        static SEQUENCE: AtomicU32 = AtomicU32::new(0);

        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let random = uuid::Uuid::new_v4().simple().to_string();

        DocumentId(format!("{millis:012x}{seq:08x}{}", &random[..12]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for DocumentId {
    fn from(value: String) -> Self {
        DocumentId(value)
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated instance of a model.
///
/// Holds exactly the model's fields, in definition order, with defaults
/// filled. Only the validator constructs one.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    model: String,
    fields: Map<String, Value>,
}

impl Document {
    pub(crate) fn new(model: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            model: model.into(),
            fields,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn collection_name(&self) -> String {
        collection_name_for(&self.model)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_name_is_lowercased_model_name() {
        assert_eq!(collection_name_for("Product"), "product");
        assert_eq!(collection_name_for("DesignRequest"), "designrequest");
        assert_eq!(collection_name_for("order"), "order");
    }

    #[test]
    fn collection_name_is_stable_and_idempotent() {
        for name in ["User", "BlogPost", "OrderItem", ""] {
            let once = collection_name_for(name);
            assert_eq!(once, collection_name_for(name));
            assert_eq!(once, collection_name_for(&once));
        }
    }

    #[test]
    fn registry_rejects_duplicate_models() {
        let mut registry = ModelRegistry::new();
        registry.register(ModelDefinition::new("Product")).unwrap();
        let err = registry
            .register(ModelDefinition::new("Product"))
            .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateModel("Product".to_string()));
    }

    #[test]
    fn registry_rejects_duplicate_fields_in_nested_models() {
        let nested = ModelDefinition::new("Line")
            .field(FieldSpec::required("sku", FieldKind::String))
            .field(FieldSpec::required("sku", FieldKind::String));
        let outer = ModelDefinition::new("Cart").field(FieldSpec::required(
            "lines",
            FieldKind::list_of(FieldKind::Object(nested)),
        ));

        let err = ModelRegistry::new().with(outer).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField { model, field } if model == "Line" && field == "sku"));
    }

    #[test]
    fn registry_preserves_registration_order() {
        let registry = ModelRegistry::new()
            .with(ModelDefinition::new("Product"))
            .unwrap()
            .with(ModelDefinition::new("Service"))
            .unwrap();

        let names: Vec<_> = registry.models().map(ModelDefinition::name).collect();
        assert_eq!(names, vec!["Product", "Service"]);
        assert_eq!(registry.collection_for("Service").as_deref(), Some("service"));
        assert!(registry.collection_for("Missing").is_none());
    }

    #[test]
    fn empty_defaults_are_fresh_per_call() {
        let spec = FieldSpec::optional("tags", FieldKind::list_of(FieldKind::String))
            .with_empty_default();
        let default = spec.default.as_ref().unwrap();

        let mut first = default.produce();
        first.as_array_mut().unwrap().push(Value::from("x"));
        assert_eq!(default.produce(), Value::Array(vec![]));
    }

    #[test]
    fn document_ids_sort_in_generation_order() {
        let ids: Vec<DocumentId> = (0..50).map(|_| DocumentId::generate()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }
}
