//! Storefront-State: schema-driven document access for the storefront
//!
//! This crate is the persistence layer of the storefront backend. It turns
//! untyped request bodies into validated documents, writes them to a
//! collection-scoped document store, and hands stored documents back with
//! caller-facing identifiers.
//!
//! ## Key Components
//!
//! - `ModelRegistry` / `ModelDefinition`: named models with typed, constrained fields
//! - `validate`: generic validator interpreting any model definition
//! - `DocumentStore`: collection-scoped insert / fetch-all / count
//! - `SurrealDocumentStore`: SurrealDB backend with an explicit unavailable state
//! - `normalize`: internal `_id` to external string `id`

mod error;
pub mod fakes;
mod handle;
pub mod normalize;
mod schema;
pub mod storage_traits;
pub mod validate;

pub use error::{FieldError, FieldErrorKind, SchemaError, StoreError, ValidationError};
pub use handle::{StoreConfig, SurrealDocumentStore};
pub use normalize::{normalize, normalize_all, EXTERNAL_ID_FIELD};
pub use schema::{
    collection_name_for, Constraint, DefaultValue, Document, DocumentId, FieldKind, FieldSpec,
    ModelDefinition, ModelRegistry, RawDocument,
};
pub use storage_traits::{DocumentStore, StorageResult, INTERNAL_ID_FIELD};
pub use validate::{validate, validate_against};
