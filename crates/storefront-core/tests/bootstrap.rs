//! Startup seeding: idempotency and failure reporting.

use serde_json::json;
use storefront_core::seed::{bootstrap, demo_products, SeedStatus};
use storefront_core::storefront_registry;
use storefront_state::fakes::MemoryDocumentStore;
use storefront_state::{normalize_all, DocumentStore, SurrealDocumentStore};

#[tokio::test]
async fn seeds_empty_collections() {
    let registry = storefront_registry().unwrap();
    let store = MemoryDocumentStore::new();

    let report = bootstrap(&registry, &store).await;

    assert_eq!(
        report.status_of("product"),
        Some(&SeedStatus::Seeded { inserted: 3 })
    );
    assert_eq!(
        report.status_of("service"),
        Some(&SeedStatus::Seeded { inserted: 3 })
    );
    assert_eq!(report.inserted(), 6);
    assert_eq!(store.count("product").await.unwrap(), 3);
    assert_eq!(store.count("service").await.unwrap(), 3);
}

#[tokio::test]
async fn second_run_does_not_duplicate() {
    let registry = storefront_registry().unwrap();
    let store = MemoryDocumentStore::new();

    bootstrap(&registry, &store).await;
    let report = bootstrap(&registry, &store).await;

    assert_eq!(
        report.status_of("product"),
        Some(&SeedStatus::AlreadySeeded { existing: 3 })
    );
    assert_eq!(report.inserted(), 0);
    assert_eq!(store.count("product").await.unwrap(), 3);
    assert_eq!(store.count("service").await.unwrap(), 3);
}

#[tokio::test]
async fn non_empty_collection_is_left_alone() {
    let registry = storefront_registry().unwrap();
    let store = MemoryDocumentStore::new();
    let existing = storefront_state::validate(
        &registry,
        "Service",
        &json!({"name": "Custom", "base_price": 1}),
    )
    .unwrap();
    store.insert("service", &existing).await.unwrap();

    let report = bootstrap(&registry, &store).await;

    assert_eq!(
        report.status_of("service"),
        Some(&SeedStatus::AlreadySeeded { existing: 1 })
    );
    assert_eq!(store.count("service").await.unwrap(), 1);
    assert_eq!(store.count("product").await.unwrap(), 3);
}

#[tokio::test]
async fn unavailable_store_is_skipped() {
    let registry = storefront_registry().unwrap();
    let store = MemoryDocumentStore::unavailable();

    let report = bootstrap(&registry, &store).await;

    assert_eq!(report.status_of("product"), Some(&SeedStatus::Unavailable));
    assert_eq!(report.status_of("service"), Some(&SeedStatus::Unavailable));
    assert!(!report.has_failures());
}

#[tokio::test]
async fn driver_failure_is_reported_not_raised() {
    let registry = storefront_registry().unwrap();
    let store = MemoryDocumentStore::failing();

    let report = bootstrap(&registry, &store).await;

    assert!(report.has_failures());
    assert!(matches!(
        report.status_of("product"),
        Some(SeedStatus::Failed { .. })
    ));
    // Seeding stops at the first failing collection
    assert!(report.status_of("service").is_none());
}

#[tokio::test]
async fn seeded_products_are_served_in_literal_order_on_surreal() {
    let registry = storefront_registry().unwrap();
    let store = SurrealDocumentStore::in_memory().await.unwrap();

    bootstrap(&registry, &store).await;
    let second = bootstrap(&registry, &store).await;
    assert_eq!(
        second.status_of("product"),
        Some(&SeedStatus::AlreadySeeded { existing: 3 })
    );

    let products = normalize_all(store.fetch_all("product").await.unwrap());
    let titles: Vec<_> = products.iter().map(|p| p["title"].clone()).collect();
    let expected: Vec<_> = demo_products()
        .into_iter()
        .map(|p| p["title"].clone())
        .collect();

    assert_eq!(titles, expected);
    assert!(products
        .iter()
        .all(|p| p["id"].as_str().is_some_and(|id| !id.is_empty())));
    assert!(products.iter().all(|p| p["in_stock"] == json!(true)));
}
