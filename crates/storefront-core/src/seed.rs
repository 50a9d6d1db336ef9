//! Startup bootstrap of the demo catalog.
//!
//! Each target collection is filled with its literal demo documents only when
//! it is empty, so running the bootstrap against a persistent store is
//! idempotent. Seed documents are validated against their model like any
//! other write. The bootstrap never fails: every problem is reported in the
//! returned [`BootstrapReport`] and startup goes on.

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use storefront_state::{collection_name_for, validate, DocumentStore, ModelRegistry};

use crate::models;

/// What happened to one collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SeedStatus {
    /// The collection was empty and the demo documents were inserted
    Seeded { inserted: usize },
    /// The collection already held documents; nothing was written
    AlreadySeeded { existing: u64 },
    /// No live store connection
    Unavailable,
    /// Seeding stopped on this collection
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionSeed {
    pub collection: String,
    #[serde(flatten)]
    pub status: SeedStatus,
}

/// Per-collection bootstrap outcome, in processing order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BootstrapReport {
    pub collections: Vec<CollectionSeed>,
}

impl BootstrapReport {
    pub fn status_of(&self, collection: &str) -> Option<&SeedStatus> {
        self.collections
            .iter()
            .find(|c| c.collection == collection)
            .map(|c| &c.status)
    }

    /// Total documents written by this run
    pub fn inserted(&self) -> usize {
        self.collections
            .iter()
            .map(|c| match c.status {
                SeedStatus::Seeded { inserted } => inserted,
                _ => 0,
            })
            .sum()
    }

    pub fn has_failures(&self) -> bool {
        self.collections
            .iter()
            .any(|c| matches!(c.status, SeedStatus::Failed { .. }))
    }
}

/// Demo products for the `product` collection.
pub fn demo_products() -> Vec<Value> {
    vec![
        json!({
            "title": "Kartu Nama Premium",
            "description": "Kartu nama dengan finishing doff dan emboss.",
            "price": 150000,
            "category": "print",
            "image": "https://images.unsplash.com/photo-1517849845537-4d257902454a"
        }),
        json!({
            "title": "Poster A3 Glossy",
            "description": "Poster kualitas tinggi untuk promosi.",
            "price": 75000,
            "category": "print",
            "image": "https://images.unsplash.com/photo-1497032628192-86f99bcd76bc"
        }),
        json!({
            "title": "Stiker Die-cut",
            "description": "Stiker custom tahan air.",
            "price": 50000,
            "category": "print",
            "image": "https://images.unsplash.com/photo-1520975916090-3105956dac38"
        }),
    ]
}

/// Demo services for the `service` collection.
pub fn demo_services() -> Vec<Value> {
    vec![
        json!({
            "name": "Desain Logo",
            "description": "Paket pembuatan logo profesional (3 konsep)",
            "base_price": 1200000,
            "tags": ["brand", "logo"]
        }),
        json!({
            "name": "Desain Instagram Feed",
            "description": "Template feed 9 post + panduan brand",
            "base_price": 900000,
            "tags": ["social", "template"]
        }),
        json!({
            "name": "Company Profile",
            "description": "Desain company profile 8-12 halaman",
            "base_price": 2500000,
            "tags": ["print", "profile"]
        }),
    ]
}

/// Models seeded at startup, with their demo documents.
fn seed_targets() -> Vec<(&'static str, Vec<Value>)> {
    vec![
        (models::PRODUCT, demo_products()),
        (models::SERVICE, demo_services()),
    ]
}

/// Seed every empty target collection. Stops at the first failure.
#[instrument(skip_all)]
pub async fn bootstrap(registry: &ModelRegistry, store: &dyn DocumentStore) -> BootstrapReport {
    let mut report = BootstrapReport::default();

    if !store.is_available() {
        info!("Document store unavailable, skipping seeding");
        for (model, _) in seed_targets() {
            report.collections.push(CollectionSeed {
                collection: collection_name_for(model),
                status: SeedStatus::Unavailable,
            });
        }
        return report;
    }

    for (model, docs) in seed_targets() {
        let collection = collection_name_for(model);
        let status = seed_collection(registry, store, model, &collection, &docs).await;

        let failed = matches!(status, SeedStatus::Failed { .. });
        report.collections.push(CollectionSeed { collection, status });
        if failed {
            break;
        }
    }

    info!(inserted = report.inserted(), "Seeding finished");
    report
}

async fn seed_collection(
    registry: &ModelRegistry,
    store: &dyn DocumentStore,
    model: &str,
    collection: &str,
    docs: &[Value],
) -> SeedStatus {
    let existing = match store.count(collection).await {
        Ok(n) => n,
        Err(err) => return failed(collection, err.to_string()),
    };
    if existing > 0 {
        return SeedStatus::AlreadySeeded { existing };
    }

    for raw in docs {
        let document = match validate(registry, model, raw) {
            Ok(document) => document,
            Err(err) => return failed(collection, err.to_string()),
        };
        if let Err(err) = store.insert(collection, &document).await {
            return failed(collection, err.to_string());
        }
    }

    info!(collection, inserted = docs.len(), "Collection seeded");
    SeedStatus::Seeded {
        inserted: docs.len(),
    }
}

fn failed(collection: &str, reason: String) -> SeedStatus {
    warn!(collection, reason = %reason, "Seeding skipped");
    SeedStatus::Failed { reason }
}
