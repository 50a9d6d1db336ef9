//! Storage trait definitions for the storefront
//!
//! `DocumentStore` is the collection-scoped persistence seam. It is async and
//! backend-agnostic: `SurrealDocumentStore` talks to SurrealDB, and the
//! `fakes` module provides an in-memory implementation for tests.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::schema::{Document, DocumentId, RawDocument};

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StoreError>;

/// Field under which raw documents carry the store's identifier.
pub const INTERNAL_ID_FIELD: &str = "_id";

/// Collection-scoped document store.
///
/// Guarantees:
/// - An unavailable store never panics; every call checks availability.
/// - `insert` is the only writer of document identifiers.
/// - `fetch_all` yields documents in insertion order, each carrying
///   [`INTERNAL_ID_FIELD`], and yields nothing (not an error) when the store
///   is unavailable.
/// - `count` and `list_collections` report [`StoreError::Unavailable`] rather
///   than degrading.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Whether a live connection exists.
    fn is_available(&self) -> bool;

    /// Persist a validated document, returning its new identifier.
    async fn insert(&self, collection: &str, document: &Document) -> StorageResult<DocumentId>;

    /// All documents of a collection in insertion order.
    async fn fetch_all(&self, collection: &str) -> StorageResult<Vec<RawDocument>>;

    /// Number of documents in a collection.
    async fn count(&self, collection: &str) -> StorageResult<u64>;

    /// Names of the collections that currently exist.
    async fn list_collections(&self) -> StorageResult<Vec<String>>;
}
