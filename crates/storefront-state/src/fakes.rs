//! In-memory fake for the storage trait (testing only)
//!
//! `MemoryDocumentStore` satisfies the [`DocumentStore`] contract without any
//! external dependencies, and can be put into the unavailable state or made
//! to fail every call with an I/O error.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;
use crate::schema::{Document, DocumentId, RawDocument};
use crate::storage_traits::{DocumentStore, StorageResult, INTERNAL_ID_FIELD};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Available,
    Unavailable,
    Failing,
}

/// In-memory document store backed by a `HashMap<collection, Vec<document>>`.
#[derive(Debug)]
pub struct MemoryDocumentStore {
    mode: Mode,
    collections: Mutex<HashMap<String, Vec<RawDocument>>>,
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::with_mode(Mode::Available)
    }
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that behaves as if it was never connected.
    pub fn unavailable() -> Self {
        Self::with_mode(Mode::Unavailable)
    }

    /// A connected store whose every operation fails at the driver level.
    pub fn failing() -> Self {
        Self::with_mode(Mode::Failing)
    }

    fn with_mode(mode: Mode) -> Self {
        Self {
            mode,
            collections: Mutex::new(HashMap::new()),
        }
    }

    fn check(&self) -> StorageResult<()> {
        match self.mode {
            Mode::Available => Ok(()),
            Mode::Unavailable => Err(StoreError::Unavailable),
            Mode::Failing => Err(StoreError::Io("simulated driver failure".to_string())),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn is_available(&self) -> bool {
        self.mode != Mode::Unavailable
    }

    async fn insert(&self, collection: &str, document: &Document) -> StorageResult<DocumentId> {
        self.check()?;
        let id = DocumentId::generate();

        let mut raw = RawDocument::new();
        raw.insert(
            INTERNAL_ID_FIELD.to_string(),
            Value::String(id.as_str().to_string()),
        );
        raw.extend(document.fields().clone());

        let mut collections = self.collections.lock().unwrap();
        collections
            .entry(collection.to_string())
            .or_default()
            .push(raw);
        Ok(id)
    }

    async fn fetch_all(&self, collection: &str) -> StorageResult<Vec<RawDocument>> {
        match self.check() {
            Err(StoreError::Unavailable) => return Ok(Vec::new()),
            other => other?,
        }
        let collections = self.collections.lock().unwrap();
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn count(&self, collection: &str) -> StorageResult<u64> {
        self.check()?;
        let collections = self.collections.lock().unwrap();
        Ok(collections.get(collection).map_or(0, |docs| docs.len() as u64))
    }

    async fn list_collections(&self) -> StorageResult<Vec<String>> {
        self.check()?;
        let collections = self.collections.lock().unwrap();
        let mut names: Vec<String> = collections.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}
