//! HTTP routes
//!
//! - GET  /                     service banner
//! - GET  /api/products         product catalog
//! - GET  /api/services         service catalog
//! - POST /api/orders           place an order
//! - POST /api/design-requests  submit a custom design request
//! - GET  /test                 connectivity diagnostics

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use storefront_core::{diagnose, CatalogService, DiagnosticsReport, EnvPresence, Submission};
use storefront_state::RawDocument;

use crate::error::AppError;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
}

/// Build the full application router, middleware included.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(read_root))
        .route("/api/products", get(list_products))
        .route("/api/services", get(list_services))
        .route("/api/orders", post(create_order))
        .route("/api/design-requests", post(create_design_request))
        .route("/test", get(test_database))
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn read_root() -> Json<Value> {
    Json(json!({ "message": "Design & Commerce API running" }))
}

async fn list_products(State(state): State<AppState>) -> Json<Vec<RawDocument>> {
    Json(state.catalog.list_products().await)
}

async fn list_services(State(state): State<AppState>) -> Json<Vec<RawDocument>> {
    Json(state.catalog.list_services().await)
}

async fn create_order(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Submission>, AppError> {
    let Json(body) = body?;
    Ok(Json(state.catalog.create_order(&body).await?))
}

async fn create_design_request(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Submission>, AppError> {
    let Json(body) = body?;
    Ok(Json(state.catalog.create_design_request(&body).await?))
}

async fn test_database(State(state): State<AppState>) -> (StatusCode, Json<DiagnosticsReport>) {
    let report = diagnose(state.catalog.store().as_ref(), EnvPresence::from_env()).await;
    (StatusCode::OK, Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use storefront_core::{bootstrap, storefront_registry};
    use storefront_state::fakes::MemoryDocumentStore;
    use storefront_state::DocumentStore;
    use tower::ServiceExt;

    fn catalog(store: Arc<dyn DocumentStore>) -> CatalogService {
        CatalogService::new(Arc::new(storefront_registry().unwrap()), store)
    }

    fn test_app(store: Arc<dyn DocumentStore>) -> Router {
        app(AppState {
            catalog: catalog(store),
        })
    }

    async fn body_json<T: serde::de::DeserializeOwned>(resp: axum::response::Response) -> T {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn order_body() -> Value {
        json!({
            "customer_name": "Sari",
            "customer_email": "sari@example.com",
            "items": [{"product_id": "p1", "title": "Poster A3 Glossy", "price": 75000, "subtotal": 75000}],
            "total": 75000
        })
    }

    #[tokio::test]
    async fn root_returns_banner() {
        let resp = test_app(Arc::new(MemoryDocumentStore::new()))
            .oneshot(get_req("/"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = body_json(resp).await;
        assert_eq!(body["message"], "Design & Commerce API running");
    }

    #[tokio::test]
    async fn products_are_listed_with_external_ids() {
        let store = Arc::new(MemoryDocumentStore::new());
        let registry = storefront_registry().unwrap();
        bootstrap(&registry, store.as_ref()).await;

        let resp = test_app(store).oneshot(get_req("/api/products")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let products: Vec<Value> = body_json(resp).await;
        assert_eq!(products.len(), 3);
        assert_eq!(products[0]["title"], "Kartu Nama Premium");
        assert!(products.iter().all(|p| p["id"].is_string()));
        assert!(products.iter().all(|p| p.get("_id").is_none()));
    }

    #[tokio::test]
    async fn catalog_is_empty_when_store_unavailable() {
        let resp = test_app(Arc::new(MemoryDocumentStore::unavailable()))
            .oneshot(get_req("/api/services"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let services: Vec<Value> = body_json(resp).await;
        assert!(services.is_empty());
    }

    #[tokio::test]
    async fn order_is_accepted() {
        let app = test_app(Arc::new(MemoryDocumentStore::new()));

        let resp = app
            .clone()
            .oneshot(post_json("/api/orders", order_body()))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let submission: Submission = body_json(resp).await;
        assert_eq!(submission.status, "ok");
        assert!(!submission.id.is_empty());
    }

    #[tokio::test]
    async fn invalid_design_request_returns_422_with_fields() {
        let resp = test_app(Arc::new(MemoryDocumentStore::new()))
            .oneshot(post_json(
                "/api/design-requests",
                json!({"name": "Rina", "email": "rina", "budget": -1}),
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = body_json(resp).await;
        let paths: Vec<&str> = body["error"]["fields"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["path"].as_str().unwrap())
            .collect();
        assert!(paths.contains(&"email"));
        assert!(paths.contains(&"service"));
        assert!(paths.contains(&"brief"));
        assert!(paths.contains(&"budget"));
    }

    #[tokio::test]
    async fn order_against_unavailable_store_returns_500() {
        let resp = test_app(Arc::new(MemoryDocumentStore::unavailable()))
            .oneshot(post_json("/api/orders", order_body()))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = body_json(resp).await;
        assert_eq!(body["error"]["message"], "failed to persist document");
        assert!(body["error"].get("fields").is_none());
    }

    #[tokio::test]
    async fn malformed_json_uses_error_envelope() {
        let req = Request::builder()
            .method("POST")
            .uri("/api/orders")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"customer_name\": "))
            .unwrap();

        let resp = test_app(Arc::new(MemoryDocumentStore::new()))
            .oneshot(req)
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = body_json(resp).await;
        assert_eq!(body["error"]["code"], 400);
        assert!(body["error"]["message"].is_string());
        assert!(body["error"].get("fields").is_none());
    }

    #[tokio::test]
    async fn missing_content_type_uses_error_envelope() {
        let req = Request::builder()
            .method("POST")
            .uri("/api/design-requests")
            .body(Body::from(r#"{"name": "Rina"}"#))
            .unwrap();

        let resp = test_app(Arc::new(MemoryDocumentStore::new()))
            .oneshot(req)
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let body: Value = body_json(resp).await;
        assert_eq!(body["error"]["code"], 415);
    }

    #[tokio::test]
    async fn diagnostics_never_fail() {
        let resp = test_app(Arc::new(MemoryDocumentStore::failing()))
            .oneshot(get_req("/test"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let report: DiagnosticsReport = body_json(resp).await;
        assert_eq!(report.backend, "✅ Running");
        assert_eq!(report.connection_status, "Connected");
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let req = Request::builder()
            .uri("/api/products")
            .header(header::ORIGIN, "https://shop.example")
            .body(Body::empty())
            .unwrap();

        let resp = test_app(Arc::new(MemoryDocumentStore::new()))
            .oneshot(req)
            .await
            .unwrap();

        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "https://shop.example"
        );
    }
}
