//! SurrealDB Document Store - Connection and Operations
//!
//! Wraps an optional SurrealDB connection. When no connection could be
//! established the store stays in an explicit unavailable state: reads come
//! back empty, writes and counts fail with [`StoreError::Unavailable`].
//!
//! Supports in-memory (`mem://`), embedded (`surrealkv://`) and remote
//! (`ws://`, `wss://`) endpoints through `surrealdb::engine::any`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use surrealdb::engine::any::Any;
use surrealdb::opt::auth::Root;
use surrealdb::sql;
use surrealdb::Surreal;
use tracing::{debug, info, instrument, warn};

use crate::error::StoreError;
use crate::schema::{Document, DocumentId, RawDocument};
use crate::storage_traits::{DocumentStore, StorageResult, INTERNAL_ID_FIELD};

/// Connection settings for the document database
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Endpoint URL (e.g. "mem://", "surrealkv://data", "wss://db.example.com")
    pub url: String,
    /// Namespace (default: "storefront")
    pub namespace: String,
    /// Database name (default: "storefront")
    pub database: String,
    /// Root credentials, when the endpoint requires sign-in
    pub credentials: Option<(String, String)>,
}

impl StoreConfig {
    /// Create a configuration with default namespace and database
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            namespace: "storefront".to_string(),
            database: "storefront".to_string(),
            credentials: None,
        }
    }

    /// Set custom namespace
    pub fn with_namespace(mut self, ns: impl Into<String>) -> Self {
        self.namespace = ns.into();
        self
    }

    /// Set custom database
    pub fn with_database(mut self, db: impl Into<String>) -> Self {
        self.database = db.into();
        self
    }

    /// Sign in as a root user after connecting
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Create from environment variables
    ///
    /// Reads:
    /// - DATABASE_URL (required)
    /// - DATABASE_NAME (optional, default: "storefront")
    /// - DATABASE_NAMESPACE (optional, default: "storefront")
    /// - DATABASE_USERNAME / DATABASE_PASSWORD (optional, both needed for sign-in)
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("DATABASE_URL").ok()?;
        let mut config = Self::new(url);

        if let Ok(database) = std::env::var("DATABASE_NAME") {
            config = config.with_database(database);
        }
        if let Ok(namespace) = std::env::var("DATABASE_NAMESPACE") {
            config = config.with_namespace(namespace);
        }
        if let (Ok(username), Ok(password)) = (
            std::env::var("DATABASE_USERNAME"),
            std::env::var("DATABASE_PASSWORD"),
        ) {
            config = config.with_credentials(username, password);
        }
        Some(config)
    }
}

/// SurrealDB-backed implementation of [`DocumentStore`].
#[derive(Clone)]
pub struct SurrealDocumentStore {
    db: Option<Surreal<Any>>,
}

impl SurrealDocumentStore {
    /// A store with no connection.
    pub fn unavailable() -> Self {
        Self { db: None }
    }

    /// Connect to SurrealDB in-memory.
    pub async fn in_memory() -> StorageResult<Self> {
        Self::connect(&StoreConfig::new("mem://")).await
    }

    /// Connect to the configured endpoint.
    #[instrument(skip(config), fields(url = %config.url, namespace = %config.namespace, database = %config.database))]
    pub async fn connect(config: &StoreConfig) -> StorageResult<Self> {
        info!("Connecting to SurrealDB");

        let db = surrealdb::engine::any::connect(config.url.as_str())
            .await
            .map_err(|e| StoreError::Io(format!("Failed to connect to {}: {}", config.url, e)))?;

        if let Some((username, password)) = &config.credentials {
            db.signin(Root {
                username: username.as_str(),
                password: password.as_str(),
            })
            .await
            .map_err(|e| StoreError::Io(format!("Root authentication failed: {e}")))?;
        }

        db.use_ns(config.namespace.as_str())
            .use_db(config.database.as_str())
            .await
            .map_err(|e| StoreError::Io(format!("Failed to select namespace/database: {e}")))?;

        info!("SurrealDB connected");
        Ok(Self { db: Some(db) })
    }

    /// Connect when configured, otherwise (or on failure) stay unavailable.
    pub async fn connect_or_unavailable(config: Option<&StoreConfig>) -> Self {
        let Some(config) = config else {
            warn!("DATABASE_URL not set, document store unavailable");
            return Self::unavailable();
        };

        match Self::connect(config).await {
            Ok(store) => store,
            Err(err) => {
                warn!(error = %err, "Document store unavailable");
                Self::unavailable()
            }
        }
    }

    /// Connect using environment variables (see [`StoreConfig::from_env`]).
    pub async fn from_env() -> Self {
        Self::connect_or_unavailable(StoreConfig::from_env().as_ref()).await
    }

    fn db(&self) -> StorageResult<&Surreal<Any>> {
        self.db.as_ref().ok_or(StoreError::Unavailable)
    }
}

/// Convert a JSON value into a SurrealQL value.
///
/// Serializing `serde_json::Value::Null` yields NONE, which drops the field
/// on write; JSON `null` has to become SurrealQL `NULL` to survive a round
/// trip.
fn to_surreal(value: &Value) -> sql::Value {
    match value {
        Value::Null => sql::Value::Null,
        Value::Bool(b) => sql::Value::from(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                sql::Value::from(i)
            } else if let Some(u) = n.as_u64() {
                sql::Value::from(u)
            } else {
                sql::Value::from(n.as_f64().unwrap_or_default())
            }
        }
        Value::String(s) => sql::Value::from(s.as_str()),
        Value::Array(items) => {
            sql::Value::Array(sql::Array::from(items.iter().map(to_surreal).collect::<Vec<_>>()))
        }
        Value::Object(map) => sql::Value::Object(sql::Object::from(
            map.iter()
                .map(|(k, v)| (k.clone(), to_surreal(v)))
                .collect::<BTreeMap<_, _>>(),
        )),
    }
}

#[derive(Deserialize)]
struct CountRow {
    count: u64,
}

#[async_trait]
impl DocumentStore for SurrealDocumentStore {
    fn is_available(&self) -> bool {
        self.db.is_some()
    }

    #[instrument(skip(self, document), fields(model = %document.model()))]
    async fn insert(&self, collection: &str, document: &Document) -> StorageResult<DocumentId> {
        let db = self.db()?;
        let id = DocumentId::generate();
        debug!(id = %id, "Inserting document");

        let bindings = BTreeMap::from([
            ("tb".to_string(), sql::Value::from(collection)),
            ("key".to_string(), sql::Value::from(id.as_str())),
            (
                "doc".to_string(),
                to_surreal(&Value::Object(document.fields().clone())),
            ),
        ]);
        db.query("CREATE type::thing($tb, $key) CONTENT $doc")
            .bind(sql::Value::Object(sql::Object::from(bindings)))
            .await?
            .check()?;

        Ok(id)
    }

    #[instrument(skip(self))]
    async fn fetch_all(&self, collection: &str) -> StorageResult<Vec<RawDocument>> {
        let Ok(db) = self.db() else {
            return Ok(Vec::new());
        };

        // Record keys are time-ordered, so key order is insertion order
        let query = format!(
            "SELECT *, meta::id(id) AS {INTERNAL_ID_FIELD} OMIT id FROM type::table($tb)"
        );
        let mut result = db
            .query(query)
            .bind(("tb", collection.to_string()))
            .await?;

        let rows: Vec<Value> = result.take(0)?;
        Ok(rows
            .into_iter()
            .filter_map(|row| match row {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn count(&self, collection: &str) -> StorageResult<u64> {
        let db = self.db()?;

        let mut result = db
            .query("SELECT count() FROM type::table($tb) GROUP ALL")
            .bind(("tb", collection.to_string()))
            .await?;

        let rows: Vec<CountRow> = result.take(0)?;
        Ok(rows.first().map(|r| r.count).unwrap_or(0))
    }

    #[instrument(skip(self))]
    async fn list_collections(&self) -> StorageResult<Vec<String>> {
        let db = self.db()?;

        let mut result = db.query("INFO FOR DB").await?;
        let info: Option<Value> = result.take(0)?;

        Ok(info
            .as_ref()
            .and_then(|v| v.get("tables"))
            .and_then(Value::as_object)
            .map(|tables| tables.keys().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_connection() {
        let store = SurrealDocumentStore::in_memory().await;
        assert!(store.is_ok(), "Failed to connect: {:?}", store.err());
        assert!(store.unwrap().is_available());
    }

    #[tokio::test]
    async fn test_unavailable_store_rejects_writes_and_counts() {
        let store = SurrealDocumentStore::unavailable();
        assert!(!store.is_available());

        assert_eq!(store.count("product").await, Err(StoreError::Unavailable));
        assert_eq!(
            store.list_collections().await,
            Err(StoreError::Unavailable)
        );
        assert!(store.fetch_all("product").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_connect_or_unavailable_without_config() {
        let store = SurrealDocumentStore::connect_or_unavailable(None).await;
        assert!(!store.is_available());
    }

    #[tokio::test]
    async fn test_connect_or_unavailable_with_bad_endpoint() {
        let config = StoreConfig::new("nosuchscheme://nowhere");
        let store = SurrealDocumentStore::connect_or_unavailable(Some(&config)).await;
        assert!(!store.is_available());
    }

    #[test]
    fn test_json_null_becomes_surreal_null() {
        let converted = to_surreal(&serde_json::json!({
            "notes": null,
            "items": [{"qty": 2, "note": null}],
            "total": 1.5,
        }));

        let sql::Value::Object(object) = converted else {
            panic!("expected an object");
        };
        assert_eq!(object.0.get("notes"), Some(&sql::Value::Null));
        assert_eq!(object.0.get("total"), Some(&sql::Value::from(1.5)));
        let Some(sql::Value::Array(items)) = object.0.get("items") else {
            panic!("expected an array");
        };
        let sql::Value::Object(item) = &items.0[0] else {
            panic!("expected an object item");
        };
        assert_eq!(item.0.get("note"), Some(&sql::Value::Null));
        assert_eq!(item.0.get("qty"), Some(&sql::Value::from(2i64)));
    }

    #[tokio::test]
    async fn test_null_fields_survive_insert() {
        let store = SurrealDocumentStore::in_memory().await.unwrap();
        let definition = crate::ModelDefinition::new("Order")
            .field(crate::FieldSpec::required("customer_name", crate::FieldKind::String))
            .field(crate::FieldSpec::optional("customer_phone", crate::FieldKind::String))
            .field(crate::FieldSpec::optional("notes", crate::FieldKind::String));
        let document = crate::validate_against(
            &definition,
            &serde_json::json!({"customer_name": "A", "notes": null}),
        )
        .unwrap();

        store.insert("order", &document).await.unwrap();

        let rows = store.fetch_all("order").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("customer_phone"), Some(&Value::Null));
        assert_eq!(rows[0].get("notes"), Some(&Value::Null));
    }

    #[test]
    fn test_config_builders() {
        let config = StoreConfig::new("mem://")
            .with_namespace("shop")
            .with_database("main")
            .with_credentials("root", "secret");

        assert_eq!(config.namespace, "shop");
        assert_eq!(config.database, "main");
        assert_eq!(
            config.credentials,
            Some(("root".to_string(), "secret".to_string()))
        );
    }
}
