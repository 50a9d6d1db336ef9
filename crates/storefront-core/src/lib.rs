//! Storefront Core Library
//!
//! Catalog and intake orchestration on top of `storefront-state`: the
//! storefront model catalogue, read/write flows, the startup bootstrap and the
//! diagnostics report.

pub mod diagnostics;
pub mod models;
pub mod seed;
pub mod service;
pub mod telemetry;

pub use diagnostics::{diagnose, DiagnosticsReport, EnvPresence};
pub use models::storefront_registry;
pub use seed::{bootstrap, BootstrapReport, CollectionSeed, SeedStatus};
pub use service::{CatalogService, IntakeError, Submission, STORE_FAILURE_MESSAGE};
pub use telemetry::init_tracing;

pub use storefront_state::{
    DocumentStore, ModelRegistry, StoreConfig, SurrealDocumentStore, ValidationError,
};
