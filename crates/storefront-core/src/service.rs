//! Catalog and intake flows.
//!
//! Reads fetch a collection, normalize identifiers and fail soft to an empty
//! list. Writes validate against a named model and insert into that model's
//! collection; store failures reach the caller only as a stable message.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use storefront_state::{
    collection_name_for, normalize_all, validate, DocumentStore, ModelRegistry, RawDocument,
    ValidationError,
};

use crate::models;

/// Message returned to callers when a write cannot be persisted.
pub const STORE_FAILURE_MESSAGE: &str = "failed to persist document";

/// Collection served by [`CatalogService::list_products`].
pub const PRODUCT_COLLECTION: &str = "product";
/// Collection served by [`CatalogService::list_services`].
pub const SERVICE_COLLECTION: &str = "service";

/// Successful write acknowledgement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    pub status: String,
}

impl Submission {
    fn ok(id: String) -> Self {
        Self {
            id,
            status: "ok".to_string(),
        }
    }
}

/// Why a write was not accepted
#[derive(Error, Debug)]
pub enum IntakeError {
    /// The input failed model validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The document could not be persisted
    #[error("failed to persist document")]
    Store,
}

/// Composes validation, storage and identifier normalization.
#[derive(Clone)]
pub struct CatalogService {
    registry: Arc<ModelRegistry>,
    store: Arc<dyn DocumentStore>,
}

impl CatalogService {
    pub fn new(registry: Arc<ModelRegistry>, store: Arc<dyn DocumentStore>) -> Self {
        Self { registry, store }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Every document of `collection`, normalized, in store order.
    #[instrument(skip(self))]
    pub async fn list(&self, collection: &str) -> Vec<RawDocument> {
        match self.store.fetch_all(collection).await {
            Ok(docs) => normalize_all(docs),
            Err(err) => {
                warn!(error = %err, "Catalog read failed, serving empty list");
                Vec::new()
            }
        }
    }

    pub async fn list_products(&self) -> Vec<RawDocument> {
        self.list(PRODUCT_COLLECTION).await
    }

    pub async fn list_services(&self) -> Vec<RawDocument> {
        self.list(SERVICE_COLLECTION).await
    }

    /// Validate `raw` as `model_name` and store it in the model's collection.
    #[instrument(skip(self, raw))]
    pub async fn submit(&self, model_name: &str, raw: &Value) -> Result<Submission, IntakeError> {
        let document = validate(&self.registry, model_name, raw)?;
        let collection = collection_name_for(model_name);

        match self.store.insert(&collection, &document).await {
            Ok(id) => {
                info!(collection = %collection, id = %id, "Document accepted");
                Ok(Submission::ok(id.into_string()))
            }
            Err(err) => {
                error!(collection = %collection, error = %err, "Document insert failed");
                Err(IntakeError::Store)
            }
        }
    }

    pub async fn create_order(&self, raw: &Value) -> Result<Submission, IntakeError> {
        self.submit(models::ORDER, raw).await
    }

    pub async fn create_design_request(&self, raw: &Value) -> Result<Submission, IntakeError> {
        self.submit(models::DESIGN_REQUEST, raw).await
    }
}
